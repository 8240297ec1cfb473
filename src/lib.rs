// An impressionist painting surface: strokes follow the pointer and take
// their colors from the photo pixel underneath. The engine modules own all
// painting state; the binary host owns the window and input delivery.

pub mod brush;
pub mod compose;
pub mod draw;
pub mod engine;
pub mod error;
pub mod source;
pub mod surface;
pub mod tracker;
pub mod types;
