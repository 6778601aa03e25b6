use std::io::Cursor;

use crate::error::MediaError;

/// Decode and play an OGG cry, blocking until it finishes.
pub fn play_ogg(bytes: Vec<u8>) -> Result<(), MediaError> {
    let cursor = Cursor::new(bytes);
    let (_stream, handle) =
        rodio::OutputStream::try_default().map_err(|err| MediaError::Output(err.to_string()))?;
    let sink = rodio::Sink::try_new(&handle).map_err(|err| MediaError::Output(err.to_string()))?;
    let source = rodio::Decoder::new(cursor).map_err(|err| MediaError::Decode(err.to_string()))?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
