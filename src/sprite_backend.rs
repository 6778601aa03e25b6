use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crossterm::{cursor::MoveTo, queue, style::Print};
use ratatui::backend::{Backend, ClearType, CrosstermBackend, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};

const DELETE_ALL_IMAGES: &str = "\x1b_Ga=d,d=a\x1b\\";

/// Where the artwork goes on the next draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Identifies uri + geometry; an unchanged key is not retransmitted.
    pub key: String,
    pub x: u16,
    pub y: u16,
    pub sequence: String,
}

#[derive(Default, Debug)]
pub struct ArtworkRegistry {
    placement: Option<Placement>,
}

impl ArtworkRegistry {
    pub fn place(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }

    pub fn clear(&mut self) {
        self.placement = None;
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn holds(&self, key: &str) -> bool {
        self.placement
            .as_ref()
            .is_some_and(|placement| placement.key == key)
    }
}

static REGISTRY: OnceLock<Arc<Mutex<ArtworkRegistry>>> = OnceLock::new();

pub fn artwork_registry() -> Arc<Mutex<ArtworkRegistry>> {
    REGISTRY
        .get_or_init(|| Arc::new(Mutex::new(ArtworkRegistry::default())))
        .clone()
}

fn lock(registry: &Mutex<ArtworkRegistry>) -> MutexGuard<'_, ArtworkRegistry> {
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn place_artwork(placement: Placement) {
    let registry = artwork_registry();
    lock(&registry).place(placement);
}

/// Whether `key` is already registered, so its sequence need not be rebuilt.
pub fn artwork_placed(key: &str) -> bool {
    lock(&artwork_registry()).holds(key)
}

pub fn clear_artwork() {
    let registry = artwork_registry();
    lock(&registry).clear();
}

/// Crossterm backend that also emits kitty graphics for the registered
/// artwork after each cell diff is drawn.
#[derive(Debug)]
pub struct ArtworkBackend<W: Write> {
    inner: CrosstermBackend<W>,
    registry: Arc<Mutex<ArtworkRegistry>>,
    drawn: Option<String>,
}

impl<W: Write> ArtworkBackend<W> {
    pub fn new(writer: W, registry: Arc<Mutex<ArtworkRegistry>>) -> Self {
        Self {
            inner: CrosstermBackend::new(writer),
            registry,
            drawn: None,
        }
    }
}

impl<W: Write> Backend for ArtworkBackend<W> {
    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        self.inner.draw(content)?;
        let placement = lock(&self.registry).placement().cloned();
        match placement {
            Some(placement) if self.drawn.as_deref() == Some(placement.key.as_str()) => {}
            Some(placement) => {
                if self.drawn.is_some() {
                    queue!(self.inner, Print(DELETE_ALL_IMAGES))?;
                }
                queue!(
                    self.inner,
                    MoveTo(placement.x, placement.y),
                    Print(placement.sequence)
                )?;
                self.drawn = Some(placement.key);
            }
            None => {
                if self.drawn.take().is_some() {
                    queue!(self.inner, Print(DELETE_ALL_IMAGES))?;
                }
            }
        }
        Ok(())
    }

    fn append_lines(&mut self, n: u16) -> io::Result<()> {
        self.inner.append_lines(n)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.inner.hide_cursor()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.inner.show_cursor()
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        self.inner.get_cursor_position()
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        self.inner.set_cursor_position(position)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.drawn = None;
        self.inner.clear()
    }

    fn clear_region(&mut self, clear_type: ClearType) -> io::Result<()> {
        self.drawn = None;
        self.inner.clear_region(clear_type)
    }

    fn size(&self) -> io::Result<Size> {
        self.inner.size()
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        self.inner.window_size()
    }

    fn flush(&mut self) -> io::Result<()> {
        Backend::flush(&mut self.inner)
    }
}

impl<W: Write> Write for ArtworkBackend<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.inner)
    }
}
