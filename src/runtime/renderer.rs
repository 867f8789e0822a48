use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::Result;
use softbuffer::Surface;
use winit::window::Window;

use refdesk::view::{self, Frame, Palette};
use refdesk::PanelManager;

/// Presents frames drawn by [`view::render`]
///
/// Softbuffer doesn't guarantee buffer contents are preserved between
/// frames, so drawing goes to a back buffer that is copied on present.
pub struct Renderer {
    surface: Surface<Rc<Window>, Rc<Window>>,
    back_buffer: Vec<u32>,
    width: u32,
    height: u32,
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

impl Renderer {
    pub fn new(window: Rc<Window>, context: &softbuffer::Context<Rc<Window>>) -> Result<Self> {
        let size = window.inner_size();
        let mut surface = Surface::new(context, Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create surface: {}", e))?;
        surface
            .resize(non_zero(size.width), non_zero(size.height))
            .map_err(|e| anyhow::anyhow!("Failed to resize surface: {}", e))?;

        Ok(Self {
            surface,
            back_buffer: vec![0u32; size.width as usize * size.height as usize],
            width: size.width,
            height: size.height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        self.width = width;
        self.height = height;
        self.back_buffer.resize(width as usize * height as usize, 0);
        self.surface
            .resize(non_zero(width), non_zero(height))
            .map_err(|e| anyhow::anyhow!("Failed to resize surface: {}", e))
    }

    pub fn render(&mut self, manager: &PanelManager, palette: &Palette) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        {
            let mut frame = Frame::new(
                &mut self.back_buffer,
                self.width as usize,
                self.height as usize,
            );
            view::render(&mut frame, manager, palette);
        }

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("Failed to get surface buffer: {}", e))?;
        let len = buffer.len().min(self.back_buffer.len());
        buffer[..len].copy_from_slice(&self.back_buffer[..len]);
        buffer
            .present()
            .map_err(|e| anyhow::anyhow!("Failed to present buffer: {}", e))?;
        Ok(())
    }
}
