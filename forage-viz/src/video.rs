//! Video encoders for recorded episodes.
//!
//! Two containers are supported: an animated GIF written through the `image`
//! crate, which is always available, and an MP4 produced by piping raw RGB
//! frames to an `ffmpeg` subprocess. Encoders are scoped resources: `finish`
//! consumes the encoder and returns the written path, and dropping an
//! unfinished encoder cleans up whatever was staged.

use forage_core::Frame;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, RgbaImage};
use log::info;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempdir::TempDir;
use thiserror::Error;

/// Errors raised while encoding a video.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A frame's dimensions differ from the first frame's.
    #[error("frame is {found_width}x{found_height} but the stream is {width}x{height}")]
    FrameSize {
        /// Stream width, fixed by the first frame.
        width: u32,
        /// Stream height, fixed by the first frame.
        height: u32,
        /// Width of the offending frame.
        found_width: u32,
        /// Height of the offending frame.
        found_height: u32,
    },

    /// `finish` was called before any frame was written.
    #[error("no frames were written")]
    Empty,

    /// The output path has no recognized video extension.
    #[error("unsupported video container {0:?}")]
    Container(String),

    /// The ffmpeg subprocess could not be spawned or reported failure.
    #[error("ffmpeg: {0}")]
    Ffmpeg(String),

    /// Encoding through the `image` crate failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Filesystem failure while staging or writing.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A sink for equally sized RGB frames, finalized into one video file.
///
/// The first frame fixes the stream resolution; later frames of any other
/// size are rejected. `finish` consumes the encoder, so a finalized stream
/// cannot be written to again.
pub trait VideoEncoder {
    /// Appends one frame to the stream.
    fn write_frame(&mut self, frame: &Frame) -> Result<(), EncodeError>;

    /// Finalizes the stream and returns the path of the written file.
    fn finish(self: Box<Self>) -> Result<PathBuf, EncodeError>;
}

impl std::fmt::Debug for dyn VideoEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn VideoEncoder")
    }
}

/// Picks an encoder for `path` by its extension, `gif` or `mp4`.
pub fn encoder_for(path: &Path, frame_rate: f32) -> Result<Box<dyn VideoEncoder>, EncodeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "gif" => Ok(Box::new(GifVideo::create(path, frame_rate)?)),
        "mp4" => Ok(Box::new(Mpeg4Video::create(path, frame_rate)?)),
        other => Err(EncodeError::Container(other.to_string())),
    }
}

fn check_size(size: &mut Option<(u32, u32)>, width: u32, height: u32) -> Result<(), EncodeError> {
    match *size {
        None => {
            *size = Some((width, height));
            Ok(())
        }
        Some((w, h)) if w == width && h == height => Ok(()),
        Some((w, h)) => Err(EncodeError::FrameSize {
            width: w,
            height: h,
            found_width: width,
            found_height: height,
        }),
    }
}

/// Per-frame delay for `frame_rate` frames per second, kept as a ratio so
/// fractional rates stay exact.
fn frame_delay(frame_rate: f32) -> Delay {
    let denom = (frame_rate * 100.0).round().max(1.0) as u32;
    Delay::from_numer_denom_ms(100_000, denom)
}

/// Animated-GIF encoder. Always available; the fallback container when
/// ffmpeg is not installed.
pub struct GifVideo {
    encoder: Option<GifEncoder<BufWriter<File>>>,
    path: PathBuf,
    delay: Delay,
    size: Option<(u32, u32)>,
}

impl GifVideo {
    /// Opens `path` for writing an infinitely looping GIF at `frame_rate`
    /// frames per second.
    pub fn create(path: &Path, frame_rate: f32) -> Result<Self, EncodeError> {
        let file = File::create(path)?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(Self {
            encoder: Some(encoder),
            path: path.to_path_buf(),
            delay: frame_delay(frame_rate),
            size: None,
        })
    }
}

impl VideoEncoder for GifVideo {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), EncodeError> {
        let (width, height) = (frame.width() as u32, frame.height() as u32);
        check_size(&mut self.size, width, height)?;
        let mut rgba = Vec::with_capacity(frame.as_raw().len() / 3 * 4);
        for px in frame.as_raw().chunks_exact(3) {
            rgba.extend_from_slice(px);
            rgba.push(0xff);
        }
        let buffer = RgbaImage::from_raw(width, height, rgba)
            .expect("RGBA buffer length matches the frame dimensions");
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.encode_frame(image::Frame::from_parts(buffer, 0, 0, self.delay))?;
        }
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<PathBuf, EncodeError> {
        if self.size.is_none() {
            return Err(EncodeError::Empty);
        }
        // Dropping the inner encoder writes the GIF trailer.
        self.encoder.take();
        Ok(self.path.clone())
    }
}

/// MP4 encoder backed by an `ffmpeg` subprocess.
///
/// Frames are staged as raw RGB24 in a temporary directory and encoded in a
/// single pass by `finish`; dropping an unfinished encoder removes the
/// staging directory without touching the output path. The H.264 output
/// uses 4:2:0 chroma subsampling, which requires even frame dimensions.
pub struct Mpeg4Video {
    // Declared before `staging` so the writer closes before the directory
    // is removed.
    raw: Option<BufWriter<File>>,
    staging: TempDir,
    path: PathBuf,
    frame_rate: f32,
    size: Option<(u32, u32)>,
    frames: usize,
}

impl Mpeg4Video {
    /// Prepares staging for an MP4 written to `path` at `frame_rate` frames
    /// per second.
    pub fn create(path: &Path, frame_rate: f32) -> Result<Self, EncodeError> {
        let staging = TempDir::new("forage-viz")?;
        let raw = File::create(staging.path().join("frames.rgb24"))?;
        Ok(Self {
            staging,
            raw: Some(BufWriter::new(raw)),
            path: path.to_path_buf(),
            frame_rate,
            size: None,
            frames: 0,
        })
    }

    /// Whether the ffmpeg binary can be spawned.
    ///
    /// The binary is `ffmpeg` on the search path, or the value of the
    /// `FORAGE_FFMPEG` environment variable when set.
    pub fn available() -> bool {
        Command::new(ffmpeg_bin())
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

fn ffmpeg_bin() -> String {
    env::var("FORAGE_FFMPEG").unwrap_or_else(|_| "ffmpeg".to_string())
}

impl VideoEncoder for Mpeg4Video {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), EncodeError> {
        check_size(&mut self.size, frame.width() as u32, frame.height() as u32)?;
        if let Some(raw) = self.raw.as_mut() {
            raw.write_all(frame.as_raw())?;
        }
        self.frames += 1;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<PathBuf, EncodeError> {
        let (width, height) = self.size.ok_or(EncodeError::Empty)?;
        if let Some(mut raw) = self.raw.take() {
            raw.flush()?;
        }

        let output = Command::new(ffmpeg_bin())
            .arg("-hide_banner")
            .args(["-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pix_fmt", "rgb24"])
            .args(["-s", format!("{}x{}", width, height).as_str()])
            .args(["-r", format!("{}", self.frame_rate).as_str()])
            .arg("-i")
            .arg(self.staging.path().join("frames.rgb24"))
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .args(["-movflags", "+faststart"])
            .arg(&self.path)
            .output()
            .map_err(|err| EncodeError::Ffmpeg(err.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(EncodeError::Ffmpeg(stderr));
        }
        info!(
            "encoded {} frames ({}x{} @ {} fps) to {}",
            self.frames,
            width,
            height,
            self.frame_rate,
            self.path.display()
        );
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempdir::TempDir;

    fn flat(width: usize, height: usize, color: [u8; 3]) -> Frame {
        Frame::filled(width, height, color)
    }

    #[test]
    fn gif_file_starts_with_magic_bytes() -> anyhow::Result<()> {
        let dir = TempDir::new("video")?;
        let path = dir.path().join("episode.gif");
        let mut encoder: Box<dyn VideoEncoder> = Box::new(GifVideo::create(&path, 5.0)?);
        encoder.write_frame(&flat(6, 4, [255, 0, 0]))?;
        encoder.write_frame(&flat(6, 4, [0, 255, 0]))?;
        let written = encoder.finish()?;
        assert_eq!(written, path);
        let bytes = fs::read(&path)?;
        assert!(bytes.starts_with(b"GIF8"));
        assert!(bytes.len() > 13);
        Ok(())
    }

    #[test]
    fn mismatched_frame_size_is_rejected() -> anyhow::Result<()> {
        let dir = TempDir::new("video")?;
        let mut encoder = GifVideo::create(&dir.path().join("e.gif"), 5.0)?;
        encoder.write_frame(&flat(6, 4, [0, 0, 0]))?;
        let err = encoder.write_frame(&flat(4, 6, [0, 0, 0])).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::FrameSize {
                width: 6,
                height: 4,
                found_width: 4,
                found_height: 6,
            }
        ));
        Ok(())
    }

    #[test]
    fn finishing_an_empty_stream_is_an_error() -> anyhow::Result<()> {
        let dir = TempDir::new("video")?;
        let encoder: Box<dyn VideoEncoder> = Box::new(GifVideo::create(&dir.path().join("e.gif"), 5.0)?);
        assert!(matches!(encoder.finish().unwrap_err(), EncodeError::Empty));
        Ok(())
    }

    #[test]
    fn container_is_picked_by_extension() -> anyhow::Result<()> {
        let dir = TempDir::new("video")?;
        assert!(encoder_for(&dir.path().join("a.gif"), 5.0).is_ok());
        assert!(encoder_for(&dir.path().join("a.GIF"), 5.0).is_ok());
        let err = encoder_for(&dir.path().join("a.webm"), 5.0).unwrap_err();
        assert!(matches!(err, EncodeError::Container(ext) if ext == "webm"));
        Ok(())
    }

    #[test]
    fn frame_delay_matches_the_rate() {
        assert_eq!(Duration::from(frame_delay(5.0)), Duration::from_millis(200));
        assert_eq!(Duration::from(frame_delay(2.5)), Duration::from_millis(400));
    }

    #[test]
    fn mp4_encoding_works_when_ffmpeg_is_present() -> anyhow::Result<()> {
        if !Mpeg4Video::available() {
            return Ok(());
        }
        let dir = TempDir::new("video")?;
        let path = dir.path().join("episode.mp4");
        let mut encoder: Box<dyn VideoEncoder> = Box::new(Mpeg4Video::create(&path, 5.0)?);
        for i in 0..6 {
            encoder.write_frame(&flat(32, 32, [i * 40, 0, 0]))?;
        }
        let written = encoder.finish()?;
        assert_eq!(written, path);
        assert!(fs::metadata(&path)?.len() > 0);
        Ok(())
    }

    #[test]
    fn dropping_an_unfinished_mp4_leaves_no_output() -> anyhow::Result<()> {
        let dir = TempDir::new("video")?;
        let path = dir.path().join("episode.mp4");
        {
            let mut encoder = Mpeg4Video::create(&path, 5.0)?;
            encoder.write_frame(&flat(32, 32, [1, 2, 3]))?;
        }
        assert!(!path.exists());
        Ok(())
    }
}
