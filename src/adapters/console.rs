//! Text stand-ins for the voice services.
//!
//! [`ConsoleRecognizer`] treats each typed line as one recognised
//! utterance; [`LogSpeaker`] "speaks" by logging.  Both sit behind the same
//! [`Recognizer`]/[`Speaker`] ports a real speech backend would implement.

use std::io::BufRead;

use log::info;

use crate::app::ports::{Recognizer, Speaker};
use crate::error::VoiceError;

pub struct ConsoleRecognizer<R> {
    input: R,
    eof: bool,
}

impl<R: BufRead> ConsoleRecognizer<R> {
    pub fn new(input: R) -> Self {
        Self { input, eof: false }
    }

    /// The input stream has ended; further listens hear nothing.
    pub fn is_closed(&self) -> bool {
        self.eof
    }
}

impl<R: BufRead> Recognizer for ConsoleRecognizer<R> {
    fn listen(&mut self) -> Result<Option<String>, VoiceError> {
        if self.eof {
            return Ok(None);
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                self.eof = true;
                Ok(None)
            }
            Ok(_) => {
                let phrase = line.trim();
                Ok((!phrase.is_empty()).then(|| phrase.to_string()))
            }
            Err(_) => Err(VoiceError::CaptureFailed),
        }
    }
}

#[derive(Debug, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn say(&mut self, text: &str) -> Result<(), VoiceError> {
        info!("SAY | {}", text);
        Ok(())
    }
}
