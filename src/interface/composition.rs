//! 애플리케이션 조립(composition root) 모듈.

use crate::application::usecases::get_pr_changes::GetPrChangesUseCase;
use crate::application::usecases::post_pr_comment::PostPrCommentUseCase;
use crate::infrastructure::ado::{AdoClient, RestGateway};
use crate::infrastructure::auth::build_credential_provider;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    client: AdoClient,
}

impl AppComposition {
    /// PAT 유무에 따라 정적/위임 자격 증명 공급자를 선택해 조립한다.
    pub fn new(pat: Option<String>) -> Self {
        let credentials = build_credential_provider(pat);
        Self {
            client: AdoClient::new(RestGateway::new(credentials)),
        }
    }

    pub fn get_pr_changes_usecase(&self) -> GetPrChangesUseCase<'_> {
        GetPrChangesUseCase {
            gateway: &self.client,
        }
    }

    pub fn post_pr_comment_usecase(&self) -> PostPrCommentUseCase<'_> {
        PostPrCommentUseCase {
            gateway: &self.client,
        }
    }
}
