//! 입력 URL을 Azure DevOps PR 식별자로 해석하는 모듈.

use url::Url;

use super::error::{Error, Result};

/// PR을 유일하게 가리키는 4요소 식별자.
/// 요청마다 URL에서 한 번 파생되며 이후 불변이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrLocator {
    pub organization: String,
    pub project: String,
    pub repository: String,
    pub pull_request_id: u64,
}

impl PrLocator {
    /// 지원하는 두 가지 URL 형태를 감지해 식별자를 추출한다.
    /// 부분 일치는 허용하지 않는다. 전체 구조가 맞지 않으면 실패.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|_| Error::InvalidLocator(input.to_string()))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(Error::InvalidLocator(input.to_string()));
        }

        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidLocator(input.to_string()))?
            .to_ascii_lowercase();

        let segments: Vec<String> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).map(ToString::to_string).collect())
            .unwrap_or_default();

        if let Some(locator) = parse_vanity_host(&host, &segments) {
            return Ok(locator);
        }

        if let Some(locator) = parse_path_form(&segments) {
            return Ok(locator);
        }

        Err(Error::InvalidLocator(input.to_string()))
    }
}

/// /org/project/_git/repo/pullrequest/<id> 형태.
fn parse_path_form(segments: &[String]) -> Option<PrLocator> {
    if segments.len() != 6 {
        return None;
    }
    if segments[2] != "_git" || segments[4] != "pullrequest" {
        return None;
    }

    let id = parse_pr_id(&segments[5])?;

    Some(PrLocator {
        organization: segments[0].clone(),
        project: segments[1].clone(),
        repository: segments[3].clone(),
        pull_request_id: id,
    })
}

/// <org>.visualstudio.com/project/_git/repo/pullrequest/<id> 형태.
fn parse_vanity_host(host: &str, segments: &[String]) -> Option<PrLocator> {
    let organization = host.strip_suffix(".visualstudio.com")?;
    if organization.is_empty() || organization.contains('.') {
        return None;
    }
    if segments.len() != 5 {
        return None;
    }
    if segments[1] != "_git" || segments[3] != "pullrequest" {
        return None;
    }

    let id = parse_pr_id(&segments[4])?;

    Some(PrLocator {
        organization: organization.to_string(),
        project: segments[0].clone(),
        repository: segments[2].clone(),
        pull_request_id: id,
    })
}

fn parse_pr_id(raw: &str) -> Option<u64> {
    let id: u64 = raw.parse().ok()?;
    if id == 0 {
        return None;
    }
    Some(id)
}
