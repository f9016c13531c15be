//! Common imports for hosting a wheel
pub use crate::{
    color::{ColorSpace, ColorState, Hsl, Hsv, parse_color},
    geometry::{Point, Rectangle},
    interaction::{Axis, Cursor, DragMode, KeyBindings, KeyCommand, KeyDeltas, PointerSample, Response},
    notify::{ChangeEvent, Clock, ManualClock, SystemClock},
    options::{OptionsError, WheelOptions},
    pixbuf::{Pixbuf, Pixmap},
    render::{Painter, Sample, Shader},
    wheel::HueWheel
};

pub use rgb::{Rgb, Rgba};
