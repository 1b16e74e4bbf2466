#![allow(dead_code)]

use core::convert::Infallible;

use embedded_graphics::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
};
use inkpage::Engine;
use inkpage::board::ActionEvent;
use inkpage::board::sim::SimBoard;
use inkpage::drivers::display::{Display, RenderMode};
use inkpage::ui::{SCREEN_H, SCREEN_W};

/// One presented frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub mode: RenderMode,
    /// Colour of the last full clear inside the frame.
    pub cleared: Option<BinaryColor>,
    pub on_pixels: usize,
}

impl Frame {
    pub fn is_wipe_black(&self) -> bool {
        self.cleared == Some(BinaryColor::On) && self.mode == RenderMode::Full
    }
}

/// Panel stand-in that remembers every frame it was asked to show.
#[derive(Default)]
pub struct RecordingDisplay {
    pub frames: Vec<Frame>,
    pub hibernations: usize,
    pub wakes: usize,
    pub asleep: bool,
    open: bool,
    cleared: Option<BinaryColor>,
    on_pixels: usize,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modes(&self) -> Vec<RenderMode> {
        self.frames.iter().map(|f| f.mode).collect()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn wipes(&self) -> usize {
        self.frames.iter().filter(|f| f.is_wipe_black()).count()
    }
}

impl OriginDimensions for RecordingDisplay {
    fn size(&self) -> Size {
        Size::new(u32::from(SCREEN_W), u32::from(SCREEN_H))
    }
}

impl DrawTarget for RecordingDisplay {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(_, color) in pixels {
            if color == BinaryColor::On {
                self.on_pixels += 1;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.cleared = Some(color);
        self.on_pixels = 0;
        Ok(())
    }
}

impl Display for RecordingDisplay {
    fn begin_frame(&mut self) {
        assert!(!self.asleep, "drawing while hibernating");
        self.open = true;
        self.cleared = None;
        self.on_pixels = 0;
    }

    fn end_frame(&mut self) {
        assert!(self.open, "end_frame without begin_frame");
        self.open = false;
    }

    fn present(&mut self, mode: RenderMode) {
        self.frames.push(Frame {
            mode,
            cleared: self.cleared,
            on_pixels: self.on_pixels,
        });
    }

    fn hibernate(&mut self) {
        self.hibernations += 1;
        self.asleep = true;
    }

    fn wake(&mut self) {
        self.wakes += 1;
        self.asleep = false;
    }
}

/// Engine, simulated board and display with time kept in step.
pub struct Rig {
    pub engine: Engine,
    pub board: SimBoard,
    pub display: RecordingDisplay,
    pub now: u64,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_board(SimBoard::new())
    }

    /// Boot on a prepared board and present the first frame.
    pub fn with_board(board: SimBoard) -> Self {
        let mut rig = Self {
            engine: Engine::new(),
            board,
            display: RecordingDisplay::new(),
            now: 1_000,
        };
        rig.engine.boot(&mut rig.board, rig.now);
        rig.tick();
        rig
    }

    /// Advance the clock and run one loop iteration.
    pub fn advance(&mut self, ms: u64) -> bool {
        self.now += ms;
        self.tick()
    }

    pub fn tick(&mut self) -> bool {
        match self
            .engine
            .tick(&mut self.board, &mut self.display, self.now)
        {
            Ok(presented) => presented,
            Err(e) => match e {},
        }
    }

    /// Queue one event and let the engine handle it.
    pub fn press(&mut self, event: ActionEvent) {
        self.engine.push_event(event);
        self.advance(20);
    }

    pub fn press_n(&mut self, event: ActionEvent, n: usize) {
        for _ in 0..n {
            self.press(event);
        }
    }
}

pub const SENTENCE: &str = "The quick brown fox jumps over the lazy dog. ";

pub fn prose(chars: usize) -> String {
    SENTENCE.chars().cycle().take(chars).collect()
}
