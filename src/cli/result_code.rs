use crate::error::ChangesetError;

/// Process exit codes of the `changeset` commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    /// `.changeset` existed without a config file; a default one was written
    ConfigFileWasGenerated,
    /// `init` found everything in place and did nothing
    AlreadyInitialized,
    /// `.changeset/config.toml` is missing
    NotInitialized,
    NoChangesetsFound,
    UnexpectedFailure,
}

impl ResultCode {
    pub fn code(self) -> i32 {
        match self {
            ResultCode::Success => 0,
            ResultCode::ConfigFileWasGenerated => 1,
            ResultCode::AlreadyInitialized => 2,
            ResultCode::NotInitialized => -1,
            ResultCode::NoChangesetsFound => -2,
            ResultCode::UnexpectedFailure => -10,
        }
    }

    /// Result code reported for a failed command
    pub fn for_error(error: &ChangesetError) -> Self {
        match error {
            ChangesetError::NotInitialized(_) | ChangesetError::DirectoryNotFound(_) => {
                ResultCode::NotInitialized
            }
            _ => ResultCode::UnexpectedFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            ResultCode::Success,
            ResultCode::ConfigFileWasGenerated,
            ResultCode::AlreadyInitialized,
            ResultCode::NotInitialized,
            ResultCode::NoChangesetsFound,
            ResultCode::UnexpectedFailure,
        ]
        .map(ResultCode::code);

        for (i, code) in codes.iter().enumerate() {
            assert!(!codes[i + 1..].contains(code), "duplicate code {}", code);
        }
        assert_eq!(ResultCode::Success.code(), 0);
    }

    #[test]
    fn test_for_error() {
        assert_eq!(
            ResultCode::for_error(&ChangesetError::NotInitialized(PathBuf::from("x"))),
            ResultCode::NotInitialized
        );
        assert_eq!(
            ResultCode::for_error(&ChangesetError::DirectoryNotFound(PathBuf::from("x"))),
            ResultCode::NotInitialized
        );
        assert_eq!(
            ResultCode::for_error(&ChangesetError::malformed("a.md", "bad")),
            ResultCode::UnexpectedFailure
        );
    }
}
