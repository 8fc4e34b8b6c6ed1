pub mod asos_frame;
pub mod observation;
