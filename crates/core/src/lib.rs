//! Face detection with a pretrained SSD network and result annotation.

pub mod shared {
    pub mod constants;
    pub mod face_box;
    pub mod frame;
}

pub mod detection {
    pub mod domain {
        pub mod detection;
        pub mod errors;
        pub mod face_detector;
        pub mod preprocess_config;
        pub mod ssd_decoder;
    }
    pub mod infrastructure;
}

pub mod annotation {
    pub mod domain {
        pub mod annotation_style;
        pub mod result_painter;
    }
    pub mod infrastructure {
        pub mod glyph_result_painter;
    }
}

pub mod io {
    pub mod domain {
        pub mod image_reader;
        pub mod image_writer;
    }
    pub mod infrastructure {
        pub mod image_file_reader;
        pub mod image_file_writer;
    }
}

pub mod pipeline {
    pub mod annotate_image_use_case;
    pub mod detection_session;
    pub mod pipeline_logger;
}
