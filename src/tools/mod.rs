mod ffprobe_info;
mod font_loader;
mod path_validator;
mod video_reader;

pub use ffprobe_info::{VideoInfo, get_video_info};
pub use font_loader::{
    FontResolution, SAMPLE_TIMESTAMP, TextFont, preferred_font_candidates, resolve_font,
};
pub use path_validator::{validate_input_file, validate_output_extension};
pub use video_reader::{Frame, FrameSource, VideoHandle, VideoMetadata};
