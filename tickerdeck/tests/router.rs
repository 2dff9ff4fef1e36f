mod helpers;

#[path = "router/core/router_build.rs"]
mod router_build;
#[path = "router/core/router_env.rs"]
mod router_env;

#[path = "router/cache/router_cache.rs"]
mod router_cache;

#[path = "router/fallback/router_fallback.rs"]
mod router_fallback;
#[path = "router/fallback/router_end_to_end.rs"]
mod router_end_to_end;

#[path = "router/views/router_views.rs"]
mod router_views;

#[path = "router/props/router_props.rs"]
mod router_props;
