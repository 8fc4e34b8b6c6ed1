use crate::asos_data::error::AsosDataError;
use crate::calc::CalcError;
use crate::plot::error::PlotError;
use crate::request::error::RequestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeteogramError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    AsosData(#[from] AsosDataError),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}
