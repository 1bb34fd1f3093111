//! PNG export of a read-back render target.

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use crate::error::RenderError;

/// Convert packed RGBA `f32` pixels (as returned by
/// [`GpuContext::read_back`](crate::GpuContext::read_back)) to 8-bit RGBA,
/// clamping each channel to `[0, 1]`.
pub fn to_rgba8(pixels: &[f32]) -> Vec<u8> {
    pixels
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

/// Write an RGBA8 buffer as a PNG with a frame-description tEXt chunk.
pub fn export_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    description: &str,
    path: &Path,
) -> Result<(), RenderError> {
    let file = std::fs::File::create(path)
        .map_err(|e| RenderError::Export(format!("failed to create {}: {e}", path.display())))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder
        .add_text_chunk("Software".to_string(), "Fraxel".to_string())
        .map_err(|e| RenderError::Export(format!("failed to add text chunk: {e}")))?;
    encoder
        .add_text_chunk("Description".to_string(), description.to_string())
        .map_err(|e| RenderError::Export(format!("failed to add text chunk: {e}")))?;

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| RenderError::Export(format!("failed to write PNG header: {e}")))?;
    png_writer
        .write_image_data(pixels)
        .map_err(|e| RenderError::Export(format!("failed to write PNG data: {e}")))?;

    debug!("exported PNG {}x{} to {}", width, height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_clamps_and_scales() {
        let pixels = [0.0_f32, 0.5, 1.0, 2.0, -0.5, 1.0, 0.25, 1.0];
        let bytes = to_rgba8(&pixels);
        assert_eq!(bytes, vec![0, 128, 255, 255, 0, 255, 64, 255]);
    }

    #[test]
    fn export_writes_a_decodable_png() {
        let dir = std::env::temp_dir().join("fraxel-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.png");

        let pixels = to_rgba8(&vec![0.5_f32; 4 * 4 * 4]);
        export_png(&pixels, 4, 4, "Mandelbrot test frame", &path).unwrap();

        let decoder = png::Decoder::new(std::fs::File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 4);
        assert_eq!(reader.info().height, 4);
    }
}
