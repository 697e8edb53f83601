//! Host doubles for the collaborator traits.

use std::collections::{BTreeMap, VecDeque};
use std::string::String;
use std::vec::Vec;

use crate::geometry::Rect;
use crate::hal::{
    Clock, Color, Devices, FramePacer, Glyphs, KeySource, MouseSource, Surface, SystemControl,
    WallTime,
};

pub const CELL_W: i32 = 8;
pub const CELL_H: i32 = 16;

/// Pixel array that also remembers which byte was drawn in each cell.
pub struct TestDisplay {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
    chars: BTreeMap<(i32, i32), u8>,
    pub swaps: usize,
}

impl TestDisplay {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
            chars: BTreeMap::new(),
            swaps: 0,
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Byte whose cell starts exactly at `(x, y)`.
    pub fn char_at(&self, x: i32, y: i32) -> Option<u8> {
        self.chars.get(&(x, y)).copied()
    }

    /// True if `needle` appears in one run of adjacent cells on a row.
    pub fn text_contains(&self, needle: &str) -> bool {
        let mut rows: BTreeMap<i32, Vec<(i32, u8)>> = BTreeMap::new();
        for (&(x, y), &c) in &self.chars {
            rows.entry(y).or_default().push((x, c));
        }
        for cells in rows.values() {
            let mut run = String::new();
            let mut next_x = None;
            for &(x, c) in cells {
                if next_x != Some(x) {
                    if run.contains(needle) {
                        return true;
                    }
                    run.clear();
                }
                run.push(c as char);
                next_x = Some(x + CELL_W);
            }
            if run.contains(needle) {
                return true;
            }
        }
        false
    }
}

impl Surface for TestDisplay {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = color;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clip = rect.intersect(&Rect::new(0, 0, self.width, self.height));
        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                self.pixels[(y * self.width + x) as usize] = color;
            }
        }
        self.chars.retain(|&(x, y), _| !rect.contains(x, y));
    }

    fn swap(&mut self) {
        self.swaps += 1;
    }
}

impl Glyphs for TestDisplay {
    fn cell_width(&self) -> i32 {
        CELL_W
    }

    fn cell_height(&self) -> i32 {
        CELL_H
    }

    fn draw_char(&mut self, x: i32, y: i32, ch: u8, _fg: Color, bg: Color) {
        self.fill_rect(Rect::new(x, y, CELL_W, CELL_H), bg);
        self.chars.insert((x, y), ch);
    }
}

#[derive(Default)]
pub struct ScriptedKeys {
    pub queue: VecDeque<u8>,
}

impl ScriptedKeys {
    pub fn push_str(&mut self, text: &str) {
        self.queue.extend(text.bytes());
    }
}

impl KeySource for ScriptedKeys {
    fn poll(&mut self) -> Option<u8> {
        self.queue.pop_front()
    }
}

/// Mouse whose state the test sets between frames.
#[derive(Default)]
pub struct ScriptedMouse {
    pub x: i32,
    pub y: i32,
    pub left: bool,
    pub right: bool,
    pub polls: usize,
}

impl ScriptedMouse {
    pub fn set(&mut self, x: i32, y: i32, left: bool) {
        self.x = x;
        self.y = y;
        self.left = left;
    }
}

impl MouseSource for ScriptedMouse {
    fn poll(&mut self) {
        self.polls += 1;
    }

    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn left_pressed(&self) -> bool {
        self.left
    }

    fn right_pressed(&self) -> bool {
        self.right
    }
}

pub struct FixedClock(pub WallTime);

impl Clock for FixedClock {
    fn now(&mut self) -> WallTime {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingSystem {
    pub reboots: usize,
    pub halts: usize,
}

impl SystemControl for RecordingSystem {
    fn reboot(&mut self) {
        self.reboots += 1;
    }

    fn halt(&mut self) {
        self.halts += 1;
    }
}

#[derive(Default)]
pub struct CountingPacer {
    pub ticks: usize,
}

impl FramePacer for CountingPacer {
    fn wait_for_tick(&mut self) {
        self.ticks += 1;
    }
}

/// Every double in one place, lent out as a [`Devices`] per frame.
pub struct Rig {
    pub display: TestDisplay,
    pub keys: ScriptedKeys,
    pub mouse: ScriptedMouse,
    pub clock: FixedClock,
    pub system: RecordingSystem,
    pub pacer: CountingPacer,
}

impl Rig {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            display: TestDisplay::new(width, height),
            keys: ScriptedKeys::default(),
            mouse: ScriptedMouse::default(),
            clock: FixedClock(WallTime { hours: 17, minutes: 0, seconds: 0 }),
            system: RecordingSystem::default(),
            pacer: CountingPacer::default(),
        }
    }

    pub fn devices(&mut self) -> Devices<'_> {
        Devices {
            display: &mut self.display,
            keyboard: &mut self.keys,
            mouse: &mut self.mouse,
            clock: &mut self.clock,
            system: &mut self.system,
            pacer: &mut self.pacer,
        }
    }
}
