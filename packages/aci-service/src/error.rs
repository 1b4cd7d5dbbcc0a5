pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Retrieval error: {message}")]
	Retrieval { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<aci_storage::Error> for Error {
	fn from(err: aci_storage::Error) -> Self {
		match err {
			aci_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			aci_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}
