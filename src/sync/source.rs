/*
 * Steve Launcher - A Minecraft Launcher
 * Copyright (C) 2025 Josh Kropf <josh@slashdev.ca>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use anyhow::Result;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use std::io;
use std::pin::Pin;
use url::Url;

pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Open transfer of a remote file
pub struct RemoteFile {
    /// Length reported by the remote, when known
    pub length: Option<u64>,
    pub stream: ByteStream
}

/// Where manifest entries are fetched from
pub trait RemoteFileSource {
    async fn fetch(&self, url: &Url) -> Result<RemoteFile>;
}

pub struct HttpFileSource {
    client: Client
}

impl HttpFileSource {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl RemoteFileSource for HttpFileSource {
    async fn fetch(&self, url: &Url) -> Result<RemoteFile> {
        let response = self.client.get(url.clone())
            .send().await?
            .error_for_status()?;

        let length = response.content_length();
        let stream = response.bytes_stream()
            .map(|chunk| chunk.map_err(io::Error::other));

        Ok(RemoteFile { length, stream: Box::pin(stream) })
    }
}

#[cfg(test)]
mod tests {
    use futures_util::TryStreamExt;
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use wiremock::matchers::{method, path};

    use super::*;

    #[tokio::test]
    async fn http_fetch_streams_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/mods/sodium.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jar contents".to_vec()))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/mods/sodium.jar", server.uri())).unwrap();
        let remote = HttpFileSource::new().fetch(&url).await.unwrap();

        assert_eq!(remote.length, Some(12));

        let chunks: Vec<Bytes> = remote.stream.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"jar contents");
    }

    #[tokio::test]
    async fn http_fetch_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing.jar", server.uri())).unwrap();
        assert!(HttpFileSource::new().fetch(&url).await.is_err());
    }
}
