//! Paint command set and the car placeholder composition

use super::{centered_x, Canvas, Color, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Inclusive pixel box `[x0, y0, x1, y1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelBox {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub color: Color,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Fill every row with `gradient_shade(y)`
    VerticalGradient,
    Rect {
        bounds: PixelBox,
        fill: Color,
        outline: Option<Stroke>,
    },
    Polygon {
        points: Vec<(i32, i32)>,
        fill: Color,
    },
    Ellipse {
        bounds: PixelBox,
        fill: Color,
        outline: Option<Stroke>,
    },
    /// `x`/`y` is the top-left of the text run
    Text {
        x: i32,
        y: i32,
        text: String,
        size_px: f32,
        color: Color,
    },
}

/// Anything that can report the rendered width of a run of text.
pub trait TextMeasure {
    fn text_width(&self, text: &str, size_px: f32) -> u32;
}

pub const BODY_FILL: Color = Color::hex(0x2E86AB);
pub const OUTLINE: Color = Color::hex(0x1B4F72);
pub const WHEEL_FILL: Color = Color::hex(0x2C3E50);
pub const LIGHT_FILL: Color = Color::hex(0xF39C12);
pub const LIGHT_OUTLINE: Color = Color::hex(0xE67E22);
pub const WINDOW_FILL: Color = Color::hex(0x85C1E9);
pub const BRAND_COLOR: Color = Color::hex(0x1B4F72);
pub const MODEL_COLOR: Color = Color::hex(0x34495E);

pub const BRAND_SIZE_PX: f32 = 48.0;
pub const MODEL_SIZE_PX: f32 = 24.0;
pub const BRAND_Y: i32 = 100;
pub const MODEL_Y: i32 = 160;

/// Build the placeholder composition for one car: gradient, body, roof,
/// wheels, headlights, windshield, then the centered brand and model.
pub fn car_scene(brand: &str, model: &str, measure: &dyn TextMeasure) -> Canvas {
    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);

    canvas.push(PaintCommand::VerticalGradient);

    canvas.push(PaintCommand::Rect {
        bounds: PixelBox::new(150, 300, 650, 450),
        fill: BODY_FILL,
        outline: Some(Stroke { color: OUTLINE, width: 3 }),
    });

    canvas.push(PaintCommand::Polygon {
        points: vec![(200, 300), (400, 200), (600, 300)],
        fill: OUTLINE,
    });

    for bounds in [PixelBox::new(180, 420, 220, 460), PixelBox::new(580, 420, 620, 460)] {
        canvas.push(PaintCommand::Ellipse {
            bounds,
            fill: WHEEL_FILL,
            outline: Some(Stroke { color: OUTLINE, width: 2 }),
        });
    }

    for bounds in [PixelBox::new(160, 320, 180, 340), PixelBox::new(620, 320, 640, 340)] {
        canvas.push(PaintCommand::Ellipse {
            bounds,
            fill: LIGHT_FILL,
            outline: Some(Stroke { color: LIGHT_OUTLINE, width: 2 }),
        });
    }

    canvas.push(PaintCommand::Rect {
        bounds: PixelBox::new(220, 220, 580, 300),
        fill: WINDOW_FILL,
        outline: Some(Stroke { color: OUTLINE, width: 2 }),
    });

    canvas.push(centered_text(brand, BRAND_SIZE_PX, BRAND_Y, BRAND_COLOR, measure));
    canvas.push(centered_text(model, MODEL_SIZE_PX, MODEL_Y, MODEL_COLOR, measure));

    canvas
}

fn centered_text(
    text: &str,
    size_px: f32,
    y: i32,
    color: Color,
    measure: &dyn TextMeasure,
) -> PaintCommand {
    let width = measure.text_width(text, size_px);
    PaintCommand::Text {
        x: centered_x(CANVAS_WIDTH, width),
        y,
        text: text.to_string(),
        size_px,
        color,
    }
}
