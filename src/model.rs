//! Catalogue entities as exchanged with the backend.
//!
//! Read-side types (`Gesture`, `Description`, ...) carry backend-assigned ids.
//! Draft types carry only the fields a client may write.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gesture {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub id: String,
    pub value: String,
    #[serde(default)]
    pub langs: Vec<String>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    pub id: String,
    pub value: String,
    /// Missing or null on the wire decodes as no language tags.
    #[serde(default, deserialize_with = "nullable_langs")]
    pub langs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub id: String,
    #[serde(default)]
    pub langs: Vec<String>,
    /// Where the stored image can be fetched from.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureDraft {
    pub tags: Vec<String>,
    pub descriptions: Vec<DescriptionDraft>,
    pub meanings: Vec<MeaningDraft>,
    pub pictures: Vec<PictureDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionDraft {
    pub value: String,
    pub langs: Vec<String>,
    pub meanings: Vec<MeaningDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeaningDraft {
    pub value: String,
    pub langs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureDraft {
    pub langs: Vec<String>,
}

/// Metadata of an existing picture, updated independently of its file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureMeta {
    pub langs: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"••••••••")
            .finish()
    }
}

/// Image payload for picture uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PictureFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// MIME type sniffed from the content, not the file name.
    ///
    /// The backend derives the stored format from this value.
    pub fn mime_type(&self) -> &'static str {
        match image::guess_format(&self.bytes) {
            Ok(format) => format.to_mime_type(),
            Err(_) => "application/octet-stream",
        }
    }
}

fn nullable_langs<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
