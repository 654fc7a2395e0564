pub mod tool_filter;

pub use tool_filter::{
    resolve_disabled_tools, resolve_enabled_groups, should_register_group, DisabledTools,
    EnabledGroups,
};
