//! adopilot library root.
//! Clean Architecture 계층을 외부에 노출한다.

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use interface::composition::AppComposition;
use interface::server::ToolServer;

/// 라이브러리 직접 호출용 실행 함수.
/// stdin이 닫힐 때까지 도구 서버를 돌린다.
pub async fn run(pat: Option<String>) -> Result<()> {
    let composition = AppComposition::new(pat);
    ToolServer::new(composition).run().await
}
