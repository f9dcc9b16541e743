use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::{debug, log_enabled, Level};

/// Logs method, path, status and latency of every request at debug level
pub struct RequestLogger {
    enabled: bool,
}

impl RequestLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLoggerMiddleware {
            service: Rc::new(service),
            enabled: self.enabled,
        })
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: Rc<S>,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        if !self.enabled || !log_enabled!(Level::Debug) {
            return Box::pin(service.call(req));
        }

        let path = req.path().to_owned();
        let method = req.method().clone();
        let started = Instant::now();
        debug!("Processing request: {} {}", method, path);

        Box::pin(async move {
            let res = service.call(req).await?;
            debug!(
                "Response: {} {} - status: {} in {:?}",
                method,
                path,
                res.status(),
                started.elapsed()
            );
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    use super::*;

    #[actix_web::test]
    async fn test_logger_passes_responses_through() {
        for enabled in [true, false] {
            let app = test::init_service(
                App::new()
                    .wrap(RequestLogger::new(enabled))
                    .route("/", web::get().to(|| async { HttpResponse::Accepted().finish() })),
            )
            .await;

            let resp =
                test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
            assert_eq!(resp.status(), StatusCode::ACCEPTED);
        }
    }
}
