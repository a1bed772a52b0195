use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::http::{Method, header};
use actix_web::{
    Error, HttpMessage, ResponseError,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;

use crate::error::AppError;
use crate::middlewares::allowlist::{Allowlist, DEFAULT_ALLOWLIST};
use crate::models::Principal;
use crate::services::{EntitlementService, UserService};
use crate::utils::JwtService;

/// What the gate does with a request once the caller and route are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    /// Pass only if the caller holds a current subscription.
    CheckEntitlement,
    Reject(GateRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    AuthenticationRequired,
    SubscriptionRequired,
}

impl From<GateRejection> for AppError {
    fn from(rejection: GateRejection) -> Self {
        match rejection {
            GateRejection::AuthenticationRequired => AppError::AuthenticationRequired,
            GateRejection::SubscriptionRequired => AppError::SubscriptionRequired,
        }
    }
}

/// Pure part of the gate: everything except the subscription lookup.
pub fn decide(
    principal: Option<&Principal>,
    route_name: Option<&str>,
    allowlist: &Allowlist,
) -> GateDecision {
    if principal.is_some_and(|p| p.is_staff) {
        return GateDecision::Pass;
    }
    // unknown routes fall through to the 404 handler
    let Some(route_name) = route_name else {
        return GateDecision::Pass;
    };
    if allowlist.is_exempt(route_name) {
        return GateDecision::Pass;
    }
    match principal {
        Some(_) => GateDecision::CheckEntitlement,
        None => GateDecision::Reject(GateRejection::AuthenticationRequired),
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

#[derive(Clone)]
struct GateState {
    jwt_service: JwtService,
    users: UserService,
    entitlement: EntitlementService,
    allowlist: &'static Allowlist,
}

impl GateState {
    /// Any failure here leaves the caller anonymous.
    async fn authenticate(&self, token: Option<&str>) -> Option<Principal> {
        let claims = self.jwt_service.verify_access_token(token?).ok()?;
        let user_id = claims.user_id().ok()?;
        match self.users.find_active(user_id).await {
            Ok(user) => user.as_ref().map(Principal::from),
            Err(e) => {
                log::error!("Principal lookup failed for {user_id}: {e}");
                None
            }
        }
    }
}

/// Lets a request through only when its route is allowlisted, the caller is
/// staff, or the caller has an active subscription. Only paths under `/api/`
/// are inspected.
pub struct AccessGate {
    state: GateState,
}

impl AccessGate {
    pub fn new(
        jwt_service: JwtService,
        users: UserService,
        entitlement: EntitlementService,
    ) -> Self {
        Self::with_allowlist(jwt_service, users, entitlement, &DEFAULT_ALLOWLIST)
    }

    pub fn with_allowlist(
        jwt_service: JwtService,
        users: UserService,
        entitlement: EntitlementService,
        allowlist: &'static Allowlist,
    ) -> Self {
        Self {
            state: GateState {
                jwt_service,
                users,
                entitlement,
                allowlist,
            },
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateService {
            service: Rc::new(service),
            state: Rc::new(self.state.clone()),
        }))
    }
}

pub struct AccessGateService<S> {
    service: Rc<S>,
    state: Rc<GateState>,
}

impl<S, B> Service<ServiceRequest> for AccessGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let state = Rc::clone(&self.state);

        Box::pin(async move {
            // CORS preflight and non-API paths are not gated
            if req.method() == Method::OPTIONS || !req.path().starts_with("/api/") {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let principal = state.authenticate(bearer_token(&req)).await;
            if let Some(principal) = &principal {
                req.extensions_mut().insert(principal.clone());
            }

            let route_name = req.match_name().map(str::to_owned);
            let decision = decide(principal.as_ref(), route_name.as_deref(), state.allowlist);
            log::debug!(
                "access gate: {} {} route={:?} caller={:?} -> {:?}",
                req.method(),
                req.path(),
                route_name,
                principal.as_ref().map(|p| p.id),
                decision
            );

            let rejection = match decision {
                GateDecision::Pass => None,
                GateDecision::Reject(rejection) => Some(AppError::from(rejection)),
                GateDecision::CheckEntitlement => {
                    // principal is always present for CheckEntitlement
                    let user_id = principal.as_ref().map(|p| p.id);
                    match user_id {
                        Some(id) => match state.entitlement.has_active_subscription(id).await {
                            Ok(true) => None,
                            Ok(false) => Some(AppError::SubscriptionRequired),
                            Err(e) => Some(e),
                        },
                        None => Some(AppError::AuthenticationRequired),
                    }
                }
            };

            match rejection {
                None => service.call(req).await.map(ServiceResponse::map_into_left_body),
                Some(err) => {
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn principal(is_staff: bool) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            is_staff,
        }
    }

    #[test]
    fn test_staff_always_pass() {
        let staff = principal(true);
        assert_eq!(
            decide(Some(&staff), Some("v1:orders:order-hard-delete"), &DEFAULT_ALLOWLIST),
            GateDecision::Pass
        );
    }

    #[test]
    fn test_unresolved_route_passes() {
        assert_eq!(decide(None, None, &DEFAULT_ALLOWLIST), GateDecision::Pass);
    }

    #[test]
    fn test_allowlisted_route_passes_anonymous() {
        assert_eq!(
            decide(None, Some("register"), &DEFAULT_ALLOWLIST),
            GateDecision::Pass
        );
        assert_eq!(
            decide(None, Some("v1:users:users-list"), &DEFAULT_ALLOWLIST),
            GateDecision::Pass
        );
    }

    #[test]
    fn test_gated_route_needs_caller_and_subscription() {
        assert_eq!(
            decide(None, Some("v1:orders:orders-list-create"), &DEFAULT_ALLOWLIST),
            GateDecision::Reject(GateRejection::AuthenticationRequired)
        );
        let user = principal(false);
        assert_eq!(
            decide(Some(&user), Some("v1:orders:orders-list-create"), &DEFAULT_ALLOWLIST),
            GateDecision::CheckEntitlement
        );
    }
}
