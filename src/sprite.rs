//! Artwork decoding and kitty graphics escape sequences.

use base64::{engine::general_purpose, Engine as _};
use image::GenericImageView;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MediaError;

/// Kitty graphics `f=` value for PNG payloads.
const FORMAT_PNG: u32 = 100;
const CHUNK_SIZE: usize = 4096;
const IMAGE_ID: u32 = 1;

/// A decoded image ready to be transmitted to the terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Artwork {
    /// Base64 PNG bytes.
    pub payload: String,
    pub width: u32,
    pub height: u32,
}

pub fn decode_artwork(bytes: &[u8]) -> Result<Artwork, MediaError> {
    let image = image::load_from_memory(bytes).map_err(|err| MediaError::Decode(err.to_string()))?;
    let (width, height) = image.dimensions();
    Ok(Artwork {
        payload: general_purpose::STANDARD.encode(bytes),
        width,
        height,
    })
}

/// Build the chunked `ESC _ G` transmission for `artwork` scaled into
/// `cols` x `rows` cells.
pub fn kitty_sequence(artwork: &Artwork, cols: u16, rows: u16) -> Result<String, MediaError> {
    let mut sequences = String::new();
    let payload = artwork.payload.as_bytes();
    let total_chunks = payload.len().div_ceil(CHUNK_SIZE);

    for (index, chunk) in payload.chunks(CHUNK_SIZE).enumerate() {
        let more = u8::from(index + 1 < total_chunks);
        let chunk_str =
            std::str::from_utf8(chunk).map_err(|err| MediaError::Decode(err.to_string()))?;
        if index == 0 {
            let mut params = format!(
                "f={FORMAT_PNG},s={},v={},a=T,t=d,i={IMAGE_ID}",
                artwork.width, artwork.height
            );
            if cols > 0 {
                params.push_str(&format!(",c={cols}"));
            }
            if rows > 0 {
                params.push_str(&format!(",r={rows}"));
            }
            params.push_str(&format!(",m={more}"));
            sequences.push_str(&format!("\x1b_G{params};{chunk_str}\x1b\\"));
        } else {
            sequences.push_str(&format!("\x1b_Gm={more};{chunk_str}\x1b\\"));
        }
    }
    Ok(sequences)
}

/// Largest cell box that keeps the image's aspect ratio inside the area.
/// Terminal cells are roughly twice as tall as they are wide.
pub fn fit_cells(artwork: &Artwork, max_cols: u16, max_rows: u16) -> (u16, u16) {
    const CELL_ASPECT: f32 = 2.0;
    if artwork.width == 0 || artwork.height == 0 || max_cols == 0 || max_rows == 0 {
        return (0, 0);
    }
    let ratio = artwork.width as f32 / artwork.height as f32;
    let mut cols = max_cols as f32;
    let mut rows = cols / ratio / CELL_ASPECT;
    if rows > max_rows as f32 {
        rows = max_rows as f32;
        cols = rows * ratio * CELL_ASPECT;
    }
    (cols.floor().max(1.0) as u16, rows.floor().max(1.0) as u16)
}
