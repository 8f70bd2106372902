mod html;
mod opentdb;

pub use html::decode_html;
pub use opentdb::{
    ApiResponse, DEFAULT_API_URL, OpenTdbClient, QuestionSource, RawQuestion, build_request_url,
    into_questions, response_code_message,
};
