//! Transcoding through the resolved ffmpeg binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Convert `input` to an mp3 next to it, deleting the input on success.
///
/// # Errors
///
/// A non-zero encoder exit propagates its stderr verbatim as
/// [`Error::ConversionFailed`]; the input file is kept in that case.
pub fn convert_to_mp3(ffmpeg: &Path, input: &Path) -> Result<PathBuf> {
    let output_path = input.with_extension("mp3");
    debug!(
        "converting {} to {}",
        input.display(),
        output_path.display()
    );

    let output = Command::new(ffmpeg)
        .arg("-i")
        .arg(input)
        .arg("-y")
        .arg(&output_path)
        .output()?;

    if !output.status.success() {
        return Err(Error::ConversionFailed {
            path: input.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    fs::remove_file(input)?;
    Ok(output_path)
}
