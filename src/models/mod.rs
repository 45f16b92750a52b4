pub mod face;
pub mod mrz;
pub mod raw_image;
pub mod result;

pub use face::FaceRegion;
pub use mrz::{CheckedField, MrzLine, MrzRecord, Sex, TD3_LINE_COUNT, TD3_LINE_LEN};
pub use raw_image::RawImage;
pub use result::{
    LayoutVerdict, PassportReport, QualityVerdict, Stage, ValidationFailure, ValidationResult,
};
