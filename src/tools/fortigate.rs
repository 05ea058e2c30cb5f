//! FortiGate REST API v2 tools. Every fixed tool is a plain monitor or cmdb
//! read; only `query_api_endpoint` takes an argument.

use super::{passthrough, Catalog, Param, ParamKind, Route, ToolDef};

const ENDPOINT: &[Param] = &[Param::required(
    "endpoint",
    ParamKind::String,
    "API endpoint path (e.g., /monitor/system/status)",
)];

const fn fixed(name: &'static str, description: &'static str, path: &'static str) -> ToolDef {
    ToolDef {
        name,
        description,
        params: &[],
        route: Route::Fixed(path),
    }
}

pub const TOOLS: &[ToolDef] = &[
    fixed(
        "get_system_status",
        "Get FortiGate system status including version, hostname, CPU/memory usage",
        "/monitor/system/status",
    ),
    fixed(
        "get_managed_switches",
        "Get information about managed FortiSwitch devices",
        "/monitor/switch-controller/managed-switch/select/",
    ),
    fixed(
        "get_access_points",
        "Get information about managed FortiAP access points",
        "/monitor/wifi/managed_ap/select/",
    ),
    fixed(
        "get_connected_devices",
        "Get information about connected user devices and endpoints",
        "/monitor/user/device/query",
    ),
    fixed(
        "get_firewall_policies",
        "Get firewall policy configurations",
        "/cmdb/firewall/policy",
    ),
    fixed(
        "get_interfaces",
        "Get network interface configurations and status",
        "/cmdb/system/interface",
    ),
    fixed(
        "get_vpn_tunnels",
        "Get IPsec VPN tunnel status and configurations",
        "/monitor/vpn/ipsec",
    ),
    fixed(
        "get_dhcp_leases",
        "Get DHCP lease information",
        "/monitor/system/dhcp/lease",
    ),
    fixed(
        "get_switch_ports",
        "Get switch port statistics and status",
        "/monitor/switch-controller/managed-switch/select/?port_stats=true",
    ),
    ToolDef {
        name: "query_api_endpoint",
        description: "Query any FortiGate API endpoint directly",
        params: ENDPOINT,
        route: Route::Build(passthrough),
    },
];

pub const CATALOG: Catalog = Catalog::new(TOOLS);
