/// Why a panel refused to start a request. Rejections are no-ops for the
/// panel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("input is empty")]
    EmptyInput,

    #[error("a request is already pending")]
    RequestPending,

    #[error("no image loaded")]
    MissingImage,
}
