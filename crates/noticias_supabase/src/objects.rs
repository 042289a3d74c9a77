use noticias_core::{Error, Result};
use tracing::debug;

use crate::SupabaseClient;

impl SupabaseClient {
    /// Uploads bytes into object storage at `bucket/path`, overwriting
    /// any existing object.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url(), bucket, path);
        debug!("upload {}", url);
        let res = self
            .authed(self.http().post(&url))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Error::Storage(format!(
                "upload of {}/{} failed: {}",
                bucket,
                path,
                res.status()
            )));
        }
        Ok(())
    }

    /// Public, fetchable URL for an object. Purely derived from the
    /// project URL; no network call involved.
    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url(),
            bucket,
            path
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{SupabaseClient, SupabaseConfig};

    #[test]
    fn public_url_shape() {
        let client = SupabaseClient::new(SupabaseConfig::new("https://proj.supabase.co", "k"));
        assert_eq!(
            client.public_object_url("noticias", "imagens/photo.png"),
            "https://proj.supabase.co/storage/v1/object/public/noticias/imagens/photo.png"
        );
    }
}
