//! Capture the rendered canvas to generate a video file
//!
//! Frames are appended as tightly packed RGBA8 rows without any header,
//! the frame size is logged whenever it changes.

use log::info;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{canvas::Canvas, surface::Surface};

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to open capture file `{path}`")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write frame {frame}")]
    Write {
        frame: u64,
        #[source]
        source: std::io::Error,
    },
}

pub struct CaptureModule<W: Write = BufWriter<File>> {
    output: W,
    frames: u64,
    frame_size: (u32, u32),
}

impl CaptureModule {
    /// Truncates any previous capture at `path`
    pub fn create(path: &Path) -> Result<Self, CaptureError> {
        let file = File::create(path).map_err(|source| CaptureError::Open {
            path: path.display().to_string(),
            source,
        })?;

        info!("Capturing frames to `{}`", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CaptureModule<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            frames: 0,
            frame_size: (0, 0),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn write_frame(&mut self, canvas: &Canvas) -> Result<(), CaptureError> {
        let size = canvas.size();
        if size != self.frame_size {
            info!(
                "Capture frame info: {{ first: {}, width: {}, height: {}, format: Rgba8 }}",
                self.frames, size.0, size.1
            );
            self.frame_size = size;
        }

        let frame = self.frames;
        self.output
            .write_all(canvas.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(|source| CaptureError::Write { frame, source })?;

        self.frames += 1;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn frames_are_appended_raw() {
        let mut canvas = Canvas::new(2, 1);
        let mut capture = CaptureModule::new(Vec::new());

        capture.write_frame(&canvas).unwrap();
        canvas.fill_all(Color::WHITE);
        capture.write_frame(&canvas).unwrap();

        assert_eq!(capture.frames(), 2);
        assert_eq!(
            capture.into_inner(),
            vec![0, 0, 0, 0, 0, 0, 0, 0, 255, 255, 255, 255, 255, 255, 255, 255]
        );
    }

    #[test]
    fn write_failures_name_the_frame() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut capture = CaptureModule::new(Broken);
        let err = capture.write_frame(&Canvas::new(1, 1)).unwrap_err();

        assert!(matches!(err, CaptureError::Write { frame: 0, .. }));
        assert_eq!(capture.frames(), 0);
    }
}
