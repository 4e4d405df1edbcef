//! yt-dlp and ffmpeg wrappers used to turn a video or audio file into
//! Whisper-sized MP3 pieces.

use crate::error::{ReductError, Result};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Bitrate for every MP3 reduct writes.
const MP3_BITRATE: &str = "192k";

/// Runs an external tool to completion, mapping a missing binary to
/// [`ReductError::ToolNotFound`] and a non-zero exit to an audio error
/// carrying its stderr.
async fn run_tool(cmd: &mut Command) -> Result<Output> {
    let tool = cmd.as_std().get_program().to_string_lossy().into_owned();
    let output = cmd
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReductError::ToolNotFound(tool.clone()),
            _ => ReductError::AudioDownload(format!("{} could not start: {}", tool, e)),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReductError::AudioDownload(format!("{} failed: {}", tool, stderr.trim())));
    }
    Ok(output)
}

/// Downloads the best audio stream of `url` as `{output_dir}/{name}.mp3`.
#[instrument(skip(output_dir))]
pub async fn download_audio(url: &str, name: &str, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let target = output_dir.join(format!("{}.mp3", name));
    let template = output_dir.join(format!("{}.%(ext)s", name));

    info!("Downloading audio from {}", url);
    run_tool(
        Command::new("yt-dlp")
            .args(["--format", "bestaudio/best", "--extract-audio"])
            .args(["--audio-format", "mp3", "--audio-quality", "192K"])
            .args(["--no-playlist", "--quiet", "--output"])
            .arg(&template)
            .arg(url),
    )
    .await?;

    if !target.is_file() {
        return Err(ReductError::AudioDownload(format!(
            "yt-dlp finished but {} is missing",
            target.display()
        )));
    }
    Ok(target)
}

/// Re-encodes the audio track of any media file into an MP3 at `dest`.
pub async fn normalize_to_mp3(source: &Path, dest: &Path) -> Result<()> {
    debug!("Encoding {} as MP3", source.display());
    encode_mp3(source, dest, None).await
}

/// ffmpeg MP3 encode, optionally limited to a `(start, length)` window in seconds.
async fn encode_mp3(source: &Path, dest: &Path, window: Option<(f64, f64)>) -> Result<()> {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-loglevel", "error", "-y"]);
    if let Some((start, _)) = window {
        cmd.arg("-ss").arg(format!("{:.3}", start));
    }
    cmd.arg("-i").arg(source);
    if let Some((_, length)) = window {
        cmd.arg("-t").arg(format!("{:.3}", length));
    }
    cmd.args(["-vn", "-codec:a", "libmp3lame", "-b:a", MP3_BITRATE]).arg(dest);

    run_tool(&mut cmd).await.map(|_| ())
}

/// Cuts `source` into MP3 pieces of at most `chunk_seconds`, in playback order.
///
/// A file that already fits is returned as the only piece.
#[instrument(skip_all)]
pub async fn split_audio(source: &Path, output_dir: &Path, chunk_seconds: u32) -> Result<Vec<PathBuf>> {
    let total = audio_duration(source).await?;
    let plan = segment_plan(total, f64::from(chunk_seconds));
    if plan.len() <= 1 {
        return Ok(vec![source.to_path_buf()]);
    }

    std::fs::create_dir_all(output_dir)?;
    let mut pieces = Vec::with_capacity(plan.len());
    for (idx, window) in plan.into_iter().enumerate() {
        let piece = output_dir.join(format!("piece_{:04}.mp3", idx));
        encode_mp3(source, &piece, Some(window)).await?;
        pieces.push(piece);
    }

    info!("Split {:.0}s of audio into {} pieces", total, pieces.len());
    Ok(pieces)
}

/// `(start, length)` windows covering `total` seconds in steps of `chunk`.
fn segment_plan(total: f64, chunk: f64) -> Vec<(f64, f64)> {
    if chunk <= 0.0 || total <= chunk {
        return vec![(0.0, total)];
    }
    let mut plan = Vec::new();
    let mut start = 0.0;
    while start < total {
        plan.push((start, chunk.min(total - start)));
        start += chunk;
    }
    plan
}

/// Duration in seconds as reported by ffprobe.
async fn audio_duration(path: &Path) -> Result<f64> {
    let output = run_tool(
        Command::new("ffprobe")
            .args(["-v", "error", "-show_entries", "format=duration"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path),
    )
    .await?;

    parse_duration(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        ReductError::AudioDownload(format!("no duration reported for {}", path.display()))
    })
}

fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .find_map(|line| line.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
}
