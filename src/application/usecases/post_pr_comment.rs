//! 파일 영역에 앵커된 리뷰 코멘트 게시 유스케이스.

use crate::application::ports::PullRequestGateway;
use crate::domain::error::Result;
use crate::domain::locator::PrLocator;
use crate::domain::pr::CommentRequest;

pub struct PostPrCommentUseCase<'a> {
    pub gateway: &'a dyn PullRequestGateway,
}

impl PostPrCommentUseCase<'_> {
    /// 라인/오프셋 범위 검증은 원격 서비스의 몫이다.
    pub async fn execute(&self, url: &str, request: &CommentRequest) -> Result<()> {
        let locator = PrLocator::parse(url)?;
        self.gateway.create_thread(&locator, request).await
    }
}
