/// Input preprocessing the network was trained with.
///
/// Any mismatch with the trained model degrades accuracy silently, so a
/// different model needs its own config rather than tweaked defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct PreprocessConfig {
    /// Network input width in pixels.
    pub input_width: u32,
    /// Network input height in pixels.
    pub input_height: u32,
    /// Per-plane mean subtracted before scaling, in `channel_order`.
    pub mean: [f32; 3],
    /// Multiplier applied after mean subtraction.
    pub scale_factor: f32,
    /// Plane order the network expects. Frames are always RGB.
    pub channel_order: ChannelOrder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Index into an RGB pixel for each output plane.
    pub fn source_indices(self) -> [usize; 3] {
        match self {
            ChannelOrder::Rgb => [0, 1, 2],
            ChannelOrder::Bgr => [2, 1, 0],
        }
    }
}

impl Default for PreprocessConfig {
    /// Values for the res10 300x300 SSD face detector (Caffe-trained on BGR).
    fn default() -> Self {
        Self {
            input_width: 300,
            input_height: 300,
            mean: [104.0, 177.0, 123.0],
            scale_factor: 1.0,
            channel_order: ChannelOrder::Bgr,
        }
    }
}
