//! Core record types for presentdeck.
//!
//! A presentation is a metadata record plus, optionally, one asset bundle of
//! three logos and a video stored under the same id.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::payload::Payload;

/// Number of logo slots in every asset record.
pub const LOGO_SLOTS: usize = 3;

/// Metadata for a single presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationRecord {
    /// Unique identifier (primary key).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Whether an asset record currently exists for this presentation.
    pub has_assets: bool,
}

impl PresentationRecord {
    /// Create a new presentation record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        has_assets: bool,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            has_assets,
        }
    }

    /// The minimal record written when assets are saved for an unknown id.
    #[must_use]
    pub fn placeholder(id: &str) -> Self {
        Self::new(id, format!("Presentation {id}"), "Description", true)
    }

    /// Check the record can be stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if the id is empty.
    pub fn validate(&self) -> Result<()> {
        validate_id(&self.id)
    }
}

/// The asset bundle stored for a presentation.
///
/// Slots may be empty: the store accepts partial records. Use
/// [`AssetRecord::is_complete`] to check whether it is ready for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Id of the owning presentation.
    pub id: String,
    /// Exactly three logo slots.
    pub logos: [Option<Payload>; LOGO_SLOTS],
    /// The video slot.
    pub video: Option<Payload>,
}

impl AssetRecord {
    /// Create an asset record with every slot empty.
    #[must_use]
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            logos: [None, None, None],
            video: None,
        }
    }

    /// Whether all three logos and the video are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.logos.iter().all(Option::is_some) && self.video.is_some()
    }

    /// Check the record can be stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if the id is empty or a payload's
    /// media type cannot be stored.
    pub fn validate(&self) -> Result<()> {
        validate_id(&self.id)?;
        self.logos
            .iter()
            .chain(std::iter::once(&self.video))
            .flatten()
            .try_for_each(Payload::validate)
    }
}

/// A complete set of assets: three non-empty logos and a non-empty video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBundle {
    logos: [Payload; LOGO_SLOTS],
    video: Payload,
}

impl AssetBundle {
    /// Build a bundle, rejecting empty payloads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteAssets`] naming the first empty slot.
    pub fn new(logos: [Payload; LOGO_SLOTS], video: Payload) -> Result<Self> {
        if let Some(index) = logos.iter().position(Payload::is_empty) {
            return Err(Error::incomplete_assets(format!(
                "logo {} is empty",
                index + 1
            )));
        }
        if video.is_empty() {
            return Err(Error::incomplete_assets("video is empty"));
        }
        Ok(Self { logos, video })
    }

    /// The logo payloads.
    #[must_use]
    pub fn logos(&self) -> &[Payload; LOGO_SLOTS] {
        &self.logos
    }

    /// The video payload.
    #[must_use]
    pub fn video(&self) -> &Payload {
        &self.video
    }

    /// Turn the bundle into the record stored for `id`.
    #[must_use]
    pub fn into_record(self, id: impl Into<String>) -> AssetRecord {
        let [a, b, c] = self.logos;
        AssetRecord {
            id: id.into(),
            logos: [Some(a), Some(b), Some(c)],
            video: Some(self.video),
        }
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::invalid_record("id must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(bytes: &[u8]) -> Payload {
        Payload::new("image/png", bytes.to_vec())
    }

    fn bundle() -> AssetBundle {
        AssetBundle::new(
            [payload(b"A"), payload(b"B"), payload(b"C")],
            Payload::new("video/mp4", b"V".to_vec()),
        )
        .unwrap()
    }

    #[test]
    fn test_placeholder_record() {
        let record = PresentationRecord::placeholder("7");
        assert_eq!(record.id, "7");
        assert_eq!(record.title, "Presentation 7");
        assert_eq!(record.description, "Description");
        assert!(record.has_assets);
    }

    #[test]
    fn test_presentation_serializes_camel_case() {
        let record = PresentationRecord::new("1", "Title", "Desc", false);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"hasAssets\":false"));
    }

    #[test]
    fn test_presentation_deserialize() {
        let json = r#"{"id":"2","title":"T","description":"D","hasAssets":true}"#;
        let record: PresentationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, PresentationRecord::new("2", "T", "D", true));
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        assert!(PresentationRecord::new("", "T", "D", false)
            .validate()
            .is_err());
        assert!(AssetRecord::empty("  ").validate().is_err());
        assert!(AssetRecord::empty("1").validate().is_ok());
    }

    #[test]
    fn test_empty_record_is_incomplete() {
        let record = AssetRecord::empty("1");
        assert!(!record.is_complete());
    }

    #[test]
    fn test_partial_record_is_incomplete() {
        let mut record = AssetRecord::empty("1");
        record.logos = [Some(payload(b"A")), Some(payload(b"B")), Some(payload(b"C"))];
        assert!(!record.is_complete());

        record.video = Some(payload(b"V"));
        assert!(record.is_complete());
    }

    #[test]
    fn test_bundle_into_record() {
        let record = bundle().into_record("1");
        assert_eq!(record.id, "1");
        assert!(record.is_complete());
        assert_eq!(record.logos[1].as_ref().unwrap().data(), b"B");
        assert_eq!(record.video.as_ref().unwrap().media_type(), "video/mp4");
    }

    #[test]
    fn test_bundle_rejects_empty_logo() {
        let err = AssetBundle::new(
            [payload(b"A"), payload(b""), payload(b"C")],
            payload(b"V"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::IncompleteAssets { .. }));
        assert!(err.to_string().contains("logo 2"));
    }

    #[test]
    fn test_bundle_rejects_empty_video() {
        let err = AssetBundle::new(
            [payload(b"A"), payload(b"B"), payload(b"C")],
            Payload::new("video/mp4", Vec::new()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("video"));
    }

    #[test]
    fn test_bundle_accessors() {
        let bundle = bundle();
        assert_eq!(bundle.logos()[0].data(), b"A");
        assert_eq!(bundle.video().data(), b"V");
    }
}
