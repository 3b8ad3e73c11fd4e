mod classify_flow;
mod cluster_overrides;
mod node_lifecycle;
mod states;
mod support;
