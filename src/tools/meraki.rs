//! Meraki Dashboard API v1 tools.

use super::{
    passthrough, Arguments, Catalog, Ident, Param, ParamKind, Route, Timespan, ToolDef,
    UpstreamRequest,
};
use crate::error::ToolError;
use serde::Deserialize;

const ORGANIZATION_ID: &[Param] = &[Param::required(
    "organizationId",
    ParamKind::String,
    "Organization ID",
)];

const NETWORK_ID: &[Param] = &[Param::required("networkId", ParamKind::String, "Network ID")];

const CLIENT_PARAMS: &[Param] = &[
    Param::required("networkId", ParamKind::String, "Network ID"),
    Param::optional(
        "timespan",
        ParamKind::Number,
        "Timespan in seconds to look back for client data (default: 86400 = 24 hours)",
    ),
];

const DEVICE_SERIAL: &[Param] = &[Param::required(
    "serial",
    ParamKind::String,
    "Device serial number",
)];

const SWITCH_SERIAL: &[Param] = &[Param::required(
    "serial",
    ParamKind::String,
    "Switch serial number",
)];

const ENDPOINT: &[Param] = &[Param::required(
    "endpoint",
    ParamKind::String,
    "API endpoint path (e.g., /organizations)",
)];

pub const TOOLS: &[ToolDef] = &[
    ToolDef {
        name: "get_organizations",
        description: "Get list of Meraki organizations accessible with the API key",
        params: &[],
        route: Route::Fixed("/organizations"),
    },
    ToolDef {
        name: "get_networks",
        description: "Get networks for a specific organization",
        params: ORGANIZATION_ID,
        route: Route::Build(organization_networks),
    },
    ToolDef {
        name: "get_devices",
        description: "Get devices for a specific organization",
        params: ORGANIZATION_ID,
        route: Route::Build(organization_devices),
    },
    ToolDef {
        name: "get_network_devices",
        description: "Get devices for a specific network",
        params: NETWORK_ID,
        route: Route::Build(network_devices),
    },
    ToolDef {
        name: "get_clients",
        description: "Get clients connected to a specific network",
        params: CLIENT_PARAMS,
        route: Route::Build(network_clients),
    },
    ToolDef {
        name: "get_device_details",
        description: "Get detailed information about a specific device",
        params: DEVICE_SERIAL,
        route: Route::Build(device_details),
    },
    ToolDef {
        name: "get_organization_inventory",
        description: "Get hardware inventory for an organization",
        params: ORGANIZATION_ID,
        route: Route::Build(organization_inventory),
    },
    ToolDef {
        name: "get_network_ssids",
        description: "Get SSID configurations for a wireless network",
        params: NETWORK_ID,
        route: Route::Build(network_ssids),
    },
    ToolDef {
        name: "get_switch_ports",
        description: "Get switch port statuses for a specific device",
        params: SWITCH_SERIAL,
        route: Route::Build(switch_ports),
    },
    ToolDef {
        name: "query_api_endpoint",
        description: "Query any Meraki API endpoint directly",
        params: ENDPOINT,
        route: Route::Build(passthrough),
    },
];

pub const CATALOG: Catalog = Catalog::new(TOOLS);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationArgs {
    organization_id: Ident,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkArgs {
    network_id: Ident,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientArgs {
    network_id: Ident,
    timespan: Option<Timespan>,
}

#[derive(Debug, Deserialize)]
struct SerialArgs {
    serial: Ident,
}

fn organization_networks(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
    let a: OrganizationArgs = args.parse()?;
    Ok(UpstreamRequest::new(format!(
        "/organizations/{}/networks",
        a.organization_id.segment()
    )))
}

fn organization_devices(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
    let a: OrganizationArgs = args.parse()?;
    Ok(UpstreamRequest::new(format!(
        "/organizations/{}/devices",
        a.organization_id.segment()
    )))
}

fn organization_inventory(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
    let a: OrganizationArgs = args.parse()?;
    Ok(UpstreamRequest::new(format!(
        "/organizations/{}/inventory/devices",
        a.organization_id.segment()
    )))
}

fn network_devices(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
    let a: NetworkArgs = args.parse()?;
    Ok(UpstreamRequest::new(format!("/networks/{}/devices", a.network_id.segment())))
}

fn network_clients(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
    let a: ClientArgs = args.parse()?;
    let timespan = a.timespan.unwrap_or_default();
    Ok(UpstreamRequest::new(format!(
        "/networks/{}/clients?timespan={}",
        a.network_id.segment(),
        urlencoding::encode(&timespan.to_string())
    )))
}

fn network_ssids(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
    let a: NetworkArgs = args.parse()?;
    Ok(UpstreamRequest::new(format!(
        "/networks/{}/wireless/ssids",
        a.network_id.segment()
    )))
}

fn device_details(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
    let a: SerialArgs = args.parse()?;
    Ok(UpstreamRequest::new(format!("/devices/{}", a.serial.segment())))
}

fn switch_ports(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
    let a: SerialArgs = args.parse()?;
    Ok(UpstreamRequest::new(format!("/devices/{}/switch/ports", a.serial.segment())))
}
