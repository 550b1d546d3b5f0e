// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · webdav
// ──────────────────────────────────────────────────────────────────────────────
// File operations on `/remote.php/dav/files/{uid}`:
//  • List folders (PROPFIND) and favorites (REPORT)
//  • Download / upload (memory or local file)
//  • Create folders, including missing parents
//  • Delete, move, copy
//  • Favorite flag (PROPPATCH)
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NcResult, NextcloudError};
use crate::multistatus::{
    filter_favorites_body, parse_multistatus_xml, propfind_allprop_body, propfind_body,
    proppatch_favorite_body,
};
use crate::request::{dav_method, encode_path, encode_segment, DavRequest, Requester};
use log::debug;
use nextcloud_types::{DavResource, PropfindDepth};
use reqwest::Method;
use std::path::Path;
use std::time::UNIX_EPOCH;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

#[derive(Clone, Copy)]
pub struct WebDav<'a> {
    requester: &'a dyn Requester,
}

impl<'a> WebDav<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    // ── Listing ──────────────────────────────────────────────────────────

    /// PROPFIND `path`. With `Depth: 1` the folder itself comes first,
    /// followed by its direct children.
    pub async fn list_folders(
        &self,
        uid: &str,
        path: &str,
        depth: PropfindDepth,
        all_properties: bool,
    ) -> NcResult<Vec<DavResource>> {
        let body = if all_properties {
            propfind_allprop_body()
        } else {
            propfind_body()
        };
        let request = DavRequest::new(dav_method("PROPFIND")?, files_path(uid, path))
            .header("Depth", depth.as_str())
            .header("Content-Type", XML_CONTENT_TYPE)
            .body(body);
        let reply = self.requester.dav(request).await?;
        parse_multistatus_xml(&reply.text())
    }

    /// Favorites at or below `path`.
    pub async fn list_favorites(&self, uid: &str, path: &str) -> NcResult<Vec<DavResource>> {
        let request = DavRequest::new(dav_method("REPORT")?, files_path(uid, path))
            .header("Content-Type", XML_CONTENT_TYPE)
            .body(filter_favorites_body());
        let reply = self.requester.dav(request).await?;
        parse_multistatus_xml(&reply.text())
    }

    // ── Transfer ─────────────────────────────────────────────────────────

    pub async fn download_file(&self, uid: &str, path: &str) -> NcResult<Vec<u8>> {
        let reply = self
            .requester
            .dav(DavRequest::new(Method::GET, files_path(uid, path)))
            .await?;
        Ok(reply.body)
    }

    /// Download `path` into the local file `target`, replacing it.
    pub async fn download_file_to(&self, uid: &str, path: &str, target: &Path) -> NcResult<u64> {
        let data = self.download_file(uid, path).await?;
        tokio::fs::write(target, &data).await?;
        debug!("downloaded {} bytes to {}", data.len(), target.display());
        Ok(data.len() as u64)
    }

    pub async fn upload_bytes(&self, uid: &str, remote_path: &str, data: Vec<u8>) -> NcResult<()> {
        let request = DavRequest::new(Method::PUT, files_path(uid, remote_path))
            .header("Content-Type", "application/octet-stream")
            .body(data);
        self.requester.dav(request).await?;
        Ok(())
    }

    /// Upload the local file `source` to `remote_path`, keeping its
    /// modification time.
    pub async fn upload_file(&self, uid: &str, source: &Path, remote_path: &str) -> NcResult<()> {
        let data = tokio::fs::read(source).await?;
        let mtime = tokio::fs::metadata(source)
            .await?
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs());

        let mut request = DavRequest::new(Method::PUT, files_path(uid, remote_path))
            .header("Content-Type", "application/octet-stream");
        if let Some(secs) = mtime {
            request = request.header("X-OC-Mtime", secs.to_string());
        }
        self.requester.dav(request.body(data)).await?;
        Ok(())
    }

    // ── Folders ──────────────────────────────────────────────────────────

    pub async fn create_folder(&self, uid: &str, path: &str) -> NcResult<()> {
        self.requester
            .dav(DavRequest::new(dav_method("MKCOL")?, files_path(uid, path)))
            .await?;
        Ok(())
    }

    /// Create `path` and any missing parents. Existing folders are fine;
    /// a file sitting where a folder should be is an error.
    pub async fn assure_folder_exists(&self, uid: &str, path: &str) -> NcResult<()> {
        let mut prefix = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            match self.create_folder(uid, &prefix).await {
                Ok(()) => {}
                // MKCOL on anything that already exists, folder or not
                Err(e @ NextcloudError::Status { status: 405, .. }) => {
                    let found = self
                        .list_folders(uid, &prefix, PropfindDepth::Zero, false)
                        .await?;
                    if !found.first().is_some_and(DavResource::is_folder) {
                        debug!("assure_folder_exists: {prefix} exists but is not a folder");
                        return Err(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    // ── Delete / move / copy ─────────────────────────────────────────────

    pub async fn delete_path(&self, uid: &str, path: &str) -> NcResult<()> {
        self.requester
            .dav(DavRequest::new(Method::DELETE, files_path(uid, path)))
            .await?;
        Ok(())
    }

    pub async fn move_path(
        &self,
        uid: &str,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> NcResult<()> {
        self.transfer("MOVE", uid, path, destination, overwrite).await
    }

    pub async fn copy_path(
        &self,
        uid: &str,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> NcResult<()> {
        self.transfer("COPY", uid, path, destination, overwrite).await
    }

    async fn transfer(
        &self,
        method: &str,
        uid: &str,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> NcResult<()> {
        let request = DavRequest::new(dav_method(method)?, files_path(uid, path))
            .header("Overwrite", if overwrite { "T" } else { "F" })
            .destination(files_path(uid, destination));
        self.requester.dav(request).await?;
        Ok(())
    }

    // ── Favorites ────────────────────────────────────────────────────────

    pub async fn set_favorites(&self, uid: &str, path: &str) -> NcResult<()> {
        self.set_favorite_flag(uid, path, true).await
    }

    pub async fn unset_favorites(&self, uid: &str, path: &str) -> NcResult<()> {
        self.set_favorite_flag(uid, path, false).await
    }

    async fn set_favorite_flag(&self, uid: &str, path: &str, favorite: bool) -> NcResult<()> {
        let request = DavRequest::new(dav_method("PROPPATCH")?, files_path(uid, path))
            .header("Content-Type", XML_CONTENT_TYPE)
            .body(proppatch_favorite_body(favorite));
        self.requester.dav(request).await?;
        Ok(())
    }
}

/// `files/{uid}/{path}` relative to the DAV root, percent-encoded.
pub fn files_path(uid: &str, path: &str) -> String {
    let encoded = encode_path(path);
    if encoded.is_empty() {
        format!("files/{}", encode_segment(uid))
    } else {
        format!("files/{}/{}", encode_segment(uid), encoded)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRequester;

    const FOLDER_XML: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:response>
    <d:href>/remote.php/dav/files/alice/Docs/</d:href>
    <d:propstat><d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop></d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/files/alice/Docs/a.txt</d:href>
    <d:propstat><d:prop><d:getcontentlength>5</d:getcontentlength><oc:favorite>1</oc:favorite></d:prop></d:propstat>
  </d:response>
</d:multistatus>"#;

    const EXISTING_FOLDER_XML: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/remote.php/dav/files/alice/a/</d:href>
    <d:propstat><d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop></d:propstat>
  </d:response>
</d:multistatus>"#;

    const EXISTING_FILE_XML: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/remote.php/dav/files/alice/notes.txt</d:href>
    <d:propstat><d:prop><d:getcontentlength>12</d:getcontentlength><d:resourcetype/></d:prop></d:propstat>
  </d:response>
</d:multistatus>"#;

    fn status(code: u16) -> NextcloudError {
        NextcloudError::Status {
            status: code,
            method: "MKCOL".into(),
            url: "https://cloud.example.com".into(),
            body: String::new(),
        }
    }

    #[test]
    fn files_path_encoding() {
        assert_eq!(files_path("alice", ""), "files/alice");
        assert_eq!(files_path("alice", "/"), "files/alice");
        assert_eq!(files_path("alice", "/My Docs/a b.txt"), "files/alice/My%20Docs/a%20b.txt");
        assert_eq!(files_path("j@x", "d"), "files/j%40x/d");
    }

    #[tokio::test]
    async fn list_folders_sends_propfind() {
        let mock = MockRequester::new();
        mock.push_dav(207, FOLDER_XML);
        let items = WebDav::new(&mock)
            .list_folders("alice", "Docs", PropfindDepth::One, false)
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_folder());
        assert_eq!(items[1].display_name, "a.txt");
        assert_eq!(items[1].content_length, Some(5));

        let req = mock.last_dav();
        assert_eq!(req.method.as_str(), "PROPFIND");
        assert_eq!(req.path, "files/alice/Docs");
        assert_eq!(req.header_value("Depth"), Some("1"));
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert!(body.contains("<oc:fileid/>"));
    }

    #[tokio::test]
    async fn list_folders_all_properties() {
        let mock = MockRequester::new();
        mock.push_dav(207, FOLDER_XML);
        WebDav::new(&mock)
            .list_folders("alice", "", PropfindDepth::Zero, true)
            .await
            .unwrap();
        let req = mock.last_dav();
        assert_eq!(req.path, "files/alice");
        assert_eq!(req.header_value("Depth"), Some("0"));
        assert!(String::from_utf8(req.body.unwrap()).unwrap().contains("<d:allprop/>"));
    }

    #[tokio::test]
    async fn favorites_report_and_proppatch() {
        let mock = MockRequester::new();
        mock.push_dav(207, FOLDER_XML);
        let dav = WebDav::new(&mock);
        let favs = dav.list_favorites("alice", "/").await.unwrap();
        assert_eq!(favs[1].favorite, Some(true));
        dav.set_favorites("alice", "Docs/a.txt").await.unwrap();
        dav.unset_favorites("alice", "Docs/a.txt").await.unwrap();

        let calls = mock.dav_calls();
        assert_eq!(calls[0].method.as_str(), "REPORT");
        assert!(String::from_utf8(calls[0].body.clone().unwrap())
            .unwrap()
            .contains("<oc:filter-rules>"));
        assert_eq!(calls[1].method.as_str(), "PROPPATCH");
        assert!(String::from_utf8(calls[1].body.clone().unwrap())
            .unwrap()
            .contains("<oc:favorite>1</oc:favorite>"));
        assert!(String::from_utf8(calls[2].body.clone().unwrap())
            .unwrap()
            .contains("<oc:favorite>0</oc:favorite>"));
    }

    #[tokio::test]
    async fn download_into_memory_and_file() {
        let mock = MockRequester::new();
        mock.push_dav(200, "hello");
        mock.push_dav(200, "world");
        let dav = WebDav::new(&mock);
        assert_eq!(dav.download_file("alice", "a.txt").await.unwrap(), b"hello");

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("b.txt");
        let written = dav.download_file_to("alice", "b.txt", &target).await.unwrap();
        assert_eq!(written, 5);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "world");
        assert!(mock.dav_calls().iter().all(|r| r.method == Method::GET));
    }

    #[tokio::test]
    async fn upload_bytes_and_file() {
        let mock = MockRequester::new();
        let dav = WebDav::new(&mock);
        dav.upload_bytes("alice", "notes/todo.txt", b"milk".to_vec())
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("local.bin");
        std::fs::write(&source, [1u8, 2, 3]).unwrap();
        dav.upload_file("alice", &source, "backup/local.bin").await.unwrap();

        let calls = mock.dav_calls();
        assert_eq!(calls[0].method, Method::PUT);
        assert_eq!(calls[0].path, "files/alice/notes/todo.txt");
        assert_eq!(calls[0].body.as_deref(), Some(&b"milk"[..]));
        assert_eq!(calls[1].path, "files/alice/backup/local.bin");
        assert_eq!(calls[1].body.as_deref(), Some(&[1u8, 2, 3][..]));
        assert!(calls[1].header_value("X-OC-Mtime").is_some());
    }

    #[tokio::test]
    async fn upload_missing_local_file_is_io_error() {
        let mock = MockRequester::new();
        let err = WebDav::new(&mock)
            .upload_file("alice", Path::new("/definitely/not/here.bin"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, NextcloudError::Io(_)));
        assert!(mock.dav_calls().is_empty());
    }

    #[tokio::test]
    async fn assure_folder_exists_tolerates_existing_segments() {
        let mock = MockRequester::new();
        mock.push_dav_error(status(405));
        mock.push_dav(207, EXISTING_FOLDER_XML);
        mock.push_dav(201, "");
        mock.push_dav(201, "");
        WebDav::new(&mock)
            .assure_folder_exists("alice", "/a/b c/d/")
            .await
            .unwrap();

        let calls: Vec<(String, String)> = mock
            .dav_calls()
            .into_iter()
            .map(|r| (r.method.to_string(), r.path))
            .collect();
        let call = |m: &str, p: &str| (m.to_string(), p.to_string());
        assert_eq!(
            calls,
            vec![
                call("MKCOL", "files/alice/a"),
                call("PROPFIND", "files/alice/a"),
                call("MKCOL", "files/alice/a/b%20c"),
                call("MKCOL", "files/alice/a/b%20c/d"),
            ]
        );
        assert_eq!(mock.dav_calls()[1].header_value("Depth"), Some("0"));
    }

    #[tokio::test]
    async fn assure_folder_exists_rejects_file_in_the_way() {
        let mock = MockRequester::new();
        mock.push_dav_error(status(405));
        mock.push_dav(207, EXISTING_FILE_XML);
        let err = WebDav::new(&mock)
            .assure_folder_exists("alice", "notes.txt/inner")
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(405));
        // Nothing is created below the file.
        assert_eq!(mock.dav_calls().len(), 2);
    }

    #[tokio::test]
    async fn assure_folder_exists_stops_on_other_errors() {
        let mock = MockRequester::new();
        mock.push_dav_error(status(403));
        let err = WebDav::new(&mock)
            .assure_folder_exists("alice", "a/b")
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(403));
        assert_eq!(mock.dav_calls().len(), 1);
    }

    #[tokio::test]
    async fn delete_move_copy() {
        let mock = MockRequester::new();
        let dav = WebDav::new(&mock);
        dav.delete_path("alice", "old.txt").await.unwrap();
        dav.move_path("alice", "a.txt", "Archive/a.txt", false).await.unwrap();
        dav.copy_path("alice", "b.txt", "Archive/b.txt", true).await.unwrap();

        let calls = mock.dav_calls();
        assert_eq!(calls[0].method, Method::DELETE);
        assert_eq!(calls[0].path, "files/alice/old.txt");
        assert_eq!(calls[1].method.as_str(), "MOVE");
        assert_eq!(calls[1].destination.as_deref(), Some("files/alice/Archive/a.txt"));
        assert_eq!(calls[1].header_value("Overwrite"), Some("F"));
        assert_eq!(calls[2].method.as_str(), "COPY");
        assert_eq!(calls[2].header_value("Overwrite"), Some("T"));
    }
}
