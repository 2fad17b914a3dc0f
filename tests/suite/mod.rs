mod dashboard_flow;
mod http_backend;
mod local_flow;
mod render;
