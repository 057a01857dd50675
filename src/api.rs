// API client module: a small blocking HTTP client that talks to one
// PocketBase collection. Every call is a single synchronous round trip;
// nothing is retried.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use reqwest::blocking::{multipart, Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{CmdimError, Result};

/// Blocking client bound to the configured collection records URL, e.g.
/// `http://127.0.0.1:8090/api/collections/files/records`.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Record returned by PocketBase after the multipart create. Only the
/// fields needed to derive the public link are required.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecord {
    pub id: String,
    pub collection_name: String,
    /// Stored file name as chosen by the server (may differ from the upload).
    pub file: String,
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// One item of the listing envelope. PocketBase omits nothing, but older
/// collections may lack `link`, so every field defaults to empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FileRecord {
    pub id: String,
    pub collection_id: String,
    pub collection_name: String,
    pub file: String,
    pub link: String,
    pub created: String,
}

/// Paginated listing envelope. Only the first page is ever requested.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    pub items: Vec<FileRecord>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Body of the follow-up PATCH storing the derived link.
#[derive(Serialize, Debug)]
struct LinkUpdate<'a> {
    link: &'a str,
}

/// Outcome of a completed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub record: CreatedRecord,
    pub link: String,
}

/// Public file URL for a created record:
/// `{scheme}//{host}/api/files/{collectionName}/{id}/{file}`, where scheme
/// and host are segments 0 and 2 of the configured URL split on `/`.
pub fn derive_link(base_url: &str, record: &CreatedRecord) -> Result<String> {
    let segments: Vec<&str> = base_url.split('/').collect();
    if segments.len() < 3 {
        return Err(CmdimError::InvalidUrl(base_url.to_string()));
    }
    Ok(format!(
        "{}//{}/api/files/{}/{}/{}",
        segments[0], segments[2], record.collection_name, record.id, record.file
    ))
}

/// Decode the create response into a typed record.
pub fn parse_created(body: &str) -> Result<CreatedRecord> {
    serde_json::from_str(body).map_err(|e| CmdimError::MalformedResponse(e.to_string()))
}

/// Decode the listing envelope.
pub fn parse_page(body: &str) -> Result<RecordPage> {
    serde_json::from_str(body).map_err(|e| CmdimError::MalformedResponse(e.to_string()))
}

/// Base name of `path` as used for both the multipart filename and the
/// `name` field.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

/// Read the body for an error report; a failed read yields an empty body.
fn body_of(res: Response) -> String {
    res.text().unwrap_or_default()
}

impl ApiClient {
    /// Create a client for the given collection URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(CmdimError::InvalidUrl(base_url));
        }
        let client = Client::builder().build()?;
        Ok(ApiClient { client, base_url })
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// GET the collection URL. Reachable means exactly 200; anything else is
    /// `Unreachable`, transport failures are `Transport`.
    pub fn check(&self) -> Result<()> {
        log::debug!(method = "GET", url = self.base_url.as_str(); "probing instance");
        let res = self.client.get(&self.base_url).send()?;
        let status = res.status();
        log::debug!(status = status.as_u16(); "probe answered");
        if status != StatusCode::OK {
            return Err(CmdimError::Unreachable {
                url: self.base_url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// POST the file as multipart. Accepts 200/201 and returns the typed
    /// record from the response body.
    pub fn create_record(&self, file_path: &Path) -> Result<CreatedRecord> {
        let file = File::open(file_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CmdimError::FileNotFound(file_path.to_path_buf()),
            _ => CmdimError::Io(e),
        })?;
        let file_name = base_name(file_path);

        let part = multipart::Part::reader(file)
            .file_name(file_name.clone())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("name", file_name);

        log::debug!(method = "POST", url = self.base_url.as_str(); "uploading file");
        let res = self.client.post(&self.base_url).multipart(form).send()?;
        let status = res.status();
        log::debug!(status = status.as_u16(); "upload answered");
        if !is_accepted(status) {
            return Err(CmdimError::UploadRejected {
                status: status.as_u16(),
                body: body_of(res),
            });
        }
        parse_created(&res.text()?)
    }

    /// PATCH `{base}/{id}` with `{"link": link}`. Accepts 200/201.
    pub fn store_link(&self, id: &str, link: &str) -> Result<()> {
        let url = self.record_url(id);
        log::debug!(method = "PATCH", url = url.as_str(); "storing derived link");
        let res = self.client.patch(&url).json(&LinkUpdate { link }).send()?;
        let status = res.status();
        log::debug!(status = status.as_u16(); "link update answered");
        if !is_accepted(status) {
            return Err(CmdimError::LinkPersistFailed {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Derive the public link of a freshly created record and write it back.
    /// On failure the record stays on the server without a link.
    pub fn link_record(&self, record: &CreatedRecord) -> Result<String> {
        let link = derive_link(&self.base_url, record)?;
        self.store_link(&record.id, &link)?;
        Ok(link)
    }

    /// Full upload flow: create the record, then derive and store its link.
    pub fn upload(&self, file_path: &Path) -> Result<Upload> {
        let record = self.create_record(file_path)?;
        let link = self.link_record(&record)?;
        Ok(Upload { record, link })
    }

    /// GET the first page of the collection.
    pub fn list(&self) -> Result<RecordPage> {
        log::debug!(method = "GET", url = self.base_url.as_str(); "listing records");
        let res = self.client.get(&self.base_url).send()?;
        let status = res.status();
        log::debug!(status = status.as_u16(); "listing answered");
        if !status.is_success() {
            return Err(CmdimError::UnexpectedStatus {
                code: status.as_u16(),
                body: body_of(res),
            });
        }
        parse_page(&res.text()?)
    }

    /// DELETE `{base}/{id}`. Only 200/201 count as success.
    pub fn delete(&self, id: &str) -> Result<()> {
        let url = self.record_url(id);
        log::debug!(method = "DELETE", url = url.as_str(); "deleting record");
        let res = self.client.delete(&url).send()?;
        let status = res.status();
        log::debug!(status = status.as_u16(); "delete answered");
        if !is_accepted(status) {
            return Err(CmdimError::DeleteFailed {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
