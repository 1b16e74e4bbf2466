// Display collaborator: an embedded-graphics draw target plus the panel
// controls the render boundary needs.

use embedded_graphics_core::{draw_target::DrawTarget, pixelcolor::BinaryColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Full waveform; clears ghosting, slowest.
    Full,
    /// Partial waveform; fastest, accumulates ghosting.
    Partial,
    /// Fast full-screen waveform used on screen changes.
    Fast,
}

pub trait Display: DrawTarget<Color = BinaryColor> {
    fn begin_frame(&mut self);

    fn end_frame(&mut self);

    fn present(&mut self, mode: RenderMode);

    fn hibernate(&mut self);

    fn wake(&mut self);
}

/// Ghost-clear wipe: solid black then solid white, each pushed with a
/// full refresh.
pub fn wipe<D: Display>(display: &mut D) -> Result<(), D::Error> {
    for color in [BinaryColor::On, BinaryColor::Off] {
        display.begin_frame();
        display.clear(color)?;
        display.end_frame();
        display.present(RenderMode::Full);
    }
    Ok(())
}
