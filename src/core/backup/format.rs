use crate::{
    core::git::SnapshotEngine,
    error::{Error, Result},
};

/// Match a requested archive format against what the engine supports.
///
/// Tries the trimmed token as given, then lowercased, then uppercased, and
/// returns the engine's spelling. `None` means "let the engine choose".
///
/// # Errors
/// [`Error::InvalidArchiveFormat`] carrying every supported format when no
/// variant matches.
pub fn resolve_archive_format<E: SnapshotEngine + ?Sized>(
    engine: &E,
    requested: Option<&str>,
) -> Result<Option<String>> {
    let Some(requested) = requested else {
        return Ok(None);
    };
    let requested = requested.trim();
    let valid = engine.archive_formats()?;

    let found = [
        requested.to_string(),
        requested.to_lowercase(),
        requested.to_uppercase(),
    ]
    .into_iter()
    .find(|candidate| valid.iter().any(|v| v == candidate));

    found.map(Some).ok_or_else(|| Error::InvalidArchiveFormat {
        format: requested.to_string(),
        valid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backup::testing::RecordingEngine;

    fn engine() -> RecordingEngine {
        RecordingEngine {
            formats: vec!["tar".into(), "tgz".into(), "tar.gz".into(), "zip".into()],
            ..RecordingEngine::default()
        }
    }

    #[test]
    fn absent_format_defers_to_engine() {
        let engine = engine();
        assert_eq!(resolve_archive_format(&engine, None).unwrap(), None);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn case_is_normalized() {
        let engine = engine();
        assert_eq!(
            resolve_archive_format(&engine, Some("ZIP")).unwrap().as_deref(),
            Some("zip")
        );
        assert_eq!(
            resolve_archive_format(&engine, Some(" tar.gz ")).unwrap().as_deref(),
            Some("tar.gz")
        );
    }

    #[test]
    fn uppercase_only_formats_match() {
        let engine = RecordingEngine {
            formats: vec!["TXZ".into()],
            ..RecordingEngine::default()
        };
        assert_eq!(
            resolve_archive_format(&engine, Some("txz")).unwrap().as_deref(),
            Some("TXZ")
        );
    }

    #[test]
    fn unknown_format_lists_valid_ones() {
        let err = resolve_archive_format(&engine(), Some("rar")).unwrap_err();
        match err {
            Error::InvalidArchiveFormat { format, valid } => {
                assert_eq!(format, "rar");
                assert_eq!(valid, ["tar", "tgz", "tar.gz", "zip"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
