/*!
 * Mapping source locations.
 *
 * A location is either a `file:` URL or a plain filesystem path. Other
 * schemes (object storage included) are not supported.
 */

use std::path::PathBuf;

use url::Url;

use crate::errors::TranslatorError;

/// Resolve a mapping location to a local file path
pub fn resolve_mapping_location(location: &str) -> Result<PathBuf, TranslatorError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(TranslatorError::Configuration(
            "Mapping file location must be set".to_string(),
        ));
    }

    match Url::parse(location) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().map_err(|_| {
            TranslatorError::Configuration(format!(
                "'{}' does not name a local file",
                location
            ))
        }),
        Ok(url) if url.scheme() == "s3" => Err(TranslatorError::Configuration(
            "S3 mapping locations are not supported".to_string(),
        )),
        // A one-letter scheme is a Windows drive letter
        Ok(url) if url.scheme().len() == 1 => Ok(PathBuf::from(location)),
        Ok(url) => Err(TranslatorError::Configuration(format!(
            "Unsupported mapping location scheme '{}:', only 'file:' URLs and paths are allowed",
            url.scheme()
        ))),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(PathBuf::from(location)),
        Err(e) => Err(TranslatorError::Configuration(format!(
            "Malformed mapping location '{}': {}",
            location, e
        ))),
    }
}
