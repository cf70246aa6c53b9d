//! Preview window for a rendered frame

use macroquad::prelude::*;

use bonnie_raster::rasterizer::Framebuffer;
use bonnie_raster::VERSION;

fn window_conf(fb: &Framebuffer) -> Conf {
    Conf {
        window_title: format!("Bonnie Raster v{}", VERSION),
        window_width: fb.width as i32,
        window_height: fb.height as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Show the framebuffer scaled to fit the window until Escape is pressed
pub fn show(fb: Framebuffer, flip_vertical: bool) {
    let (Ok(width), Ok(height)) = (u16::try_from(fb.width), u16::try_from(fb.height)) else {
        log::warn!("{}x{} is too large to preview", fb.width, fb.height);
        return;
    };

    macroquad::Window::from_config(window_conf(&fb), async move {
        let texture = Texture2D::from_rgba8(width, height, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);
        let fb_aspect = fb.width as f32 / fb.height as f32;

        loop {
            if is_key_pressed(KeyCode::Escape) {
                break;
            }

            clear_background(Color::from_rgba(30, 30, 35, 255));

            // Letterbox to keep the framebuffer aspect ratio
            let (screen_w, screen_h) = (screen_width(), screen_height());
            let (draw_w, draw_h) = if fb_aspect > screen_w / screen_h {
                (screen_w, screen_w / fb_aspect)
            } else {
                (screen_h * fb_aspect, screen_h)
            };

            draw_texture_ex(
                &texture,
                (screen_w - draw_w) * 0.5,
                (screen_h - draw_h) * 0.5,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(draw_w, draw_h)),
                    flip_y: flip_vertical,
                    ..Default::default()
                },
            );

            next_frame().await;
        }
    });
}
