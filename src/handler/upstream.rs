//! Upstream fallback
//!
//! Answers every request that no static mount claims.

use hyper::{Response, StatusCode};

use super::request::StaticRequest;
use crate::config::FallbackConfig;
use crate::error::{Error, Result};
use crate::http::{self, ResponseBody};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upstream {
    NotFound,
    Redirect {
        target: String,
        status: StatusCode,
    },
    Direct {
        status: StatusCode,
        body: Option<String>,
        content_type: Option<String>,
    },
}

impl Upstream {
    pub fn from_config(config: &FallbackConfig) -> Result<Self> {
        match config {
            FallbackConfig::NotFound => Ok(Self::NotFound),
            FallbackConfig::Redirect { target, code } => {
                let status = parse_status(*code)?;
                if !status.is_redirection() {
                    return Err(Error::InvalidConfig(format!(
                        "fallback redirect code {code} is not a 3xx status"
                    )));
                }
                Ok(Self::Redirect {
                    target: target.clone(),
                    status,
                })
            }
            FallbackConfig::Direct {
                status,
                body,
                content_type,
            } => Ok(Self::Direct {
                status: parse_status(*status)?,
                body: body.clone(),
                content_type: content_type.clone(),
            }),
        }
    }

    pub fn respond(&self, request: &StaticRequest) -> Response<ResponseBody> {
        match self {
            Self::NotFound => http::build_404_response(),
            Self::Redirect { target, status } => http::build_redirect_response(target, *status),
            Self::Direct {
                status,
                body,
                content_type,
            } => http::build_direct_response(
                *status,
                body.as_deref(),
                content_type.as_deref(),
                request.is_head(),
            ),
        }
    }
}

fn parse_status(code: u16) -> Result<StatusCode> {
    StatusCode::from_u16(code)
        .map_err(|e| Error::InvalidConfig(format!("invalid fallback status {code}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header;
    use hyper::Method;

    #[test]
    fn test_redirect_requires_3xx() {
        let config = FallbackConfig::Redirect {
            target: "/login".to_string(),
            code: 200,
        };
        assert!(matches!(
            Upstream::from_config(&config),
            Err(Error::InvalidConfig(_))
        ));

        let config = FallbackConfig::Redirect {
            target: "/login".to_string(),
            code: 308,
        };
        assert_eq!(
            Upstream::from_config(&config).unwrap(),
            Upstream::Redirect {
                target: "/login".to_string(),
                status: StatusCode::PERMANENT_REDIRECT,
            }
        );
    }

    #[test]
    fn test_rejects_invalid_status() {
        let config = FallbackConfig::Direct {
            status: 1000,
            body: None,
            content_type: None,
        };
        assert!(Upstream::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_direct_response() {
        let upstream = Upstream::from_config(&FallbackConfig::Direct {
            status: 503,
            body: Some("maintenance".to_string()),
            content_type: Some("text/plain".to_string()),
        })
        .unwrap();

        let response = upstream.respond(&StaticRequest::new(Method::GET, "/api"));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"maintenance");

        let head = upstream.respond(&StaticRequest::new(Method::HEAD, "/api"));
        assert_eq!(head.headers()[header::CONTENT_LENGTH], "11");
        let body = head.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_not_found_and_redirect() {
        let request = StaticRequest::new(Method::GET, "/anything");
        assert_eq!(
            Upstream::NotFound.respond(&request).status(),
            StatusCode::NOT_FOUND
        );

        let upstream = Upstream::from_config(&FallbackConfig::Redirect {
            target: "https://example.com/".to_string(),
            code: 302,
        })
        .unwrap();
        let response = upstream.respond(&request);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/"
        );
    }
}
