use crate::kernel::effect::RequestId;
use crate::kernel::services::ports::ApiResponse;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Response {
        id: RequestId,
        response: ApiResponse,
    },
}
