/// Where an action reports the affected instance ids inside `detail`.
///
/// `RunInstances` reports the provider-assigned ids in the response; every
/// action on an existing instance carries the caller-supplied ids in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceListLocation {
    ResponseElements,
    RequestParameters,
}

impl InstanceListLocation {
    pub fn container_key(self) -> &'static str {
        match self {
            Self::ResponseElements => "responseElements",
            Self::RequestParameters => "requestParameters",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::ResponseElements => "detail.responseElements.instancesSet.items",
            Self::RequestParameters => "detail.requestParameters.instancesSet.items",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRoute {
    pub action_name: &'static str,
    pub location: InstanceListLocation,
    pub subject_fragment: &'static str,
}

pub const ACTION_ROUTES: [ActionRoute; 5] = [
    ActionRoute {
        action_name: "RunInstances",
        location: InstanceListLocation::ResponseElements,
        subject_fragment: "EC2 Instance(s) Launched",
    },
    ActionRoute {
        action_name: "RebootInstances",
        location: InstanceListLocation::RequestParameters,
        subject_fragment: "EC2 Instance(s) Rebooted",
    },
    ActionRoute {
        action_name: "StopInstances",
        location: InstanceListLocation::RequestParameters,
        subject_fragment: "EC2 Instance(s) Stopped",
    },
    ActionRoute {
        action_name: "StartInstances",
        location: InstanceListLocation::RequestParameters,
        subject_fragment: "EC2 Instance(s) Started",
    },
    ActionRoute {
        action_name: "TerminateInstances",
        location: InstanceListLocation::RequestParameters,
        subject_fragment: "EC2 Instance(s) Terminated",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Supported(ActionRoute),
    /// Not an error: the caller logs it and skips the notification.
    Unsupported(String),
}

pub fn route(action_name: &str) -> RouteDecision {
    ACTION_ROUTES
        .iter()
        .find(|route| route.action_name == action_name)
        .map(|route| RouteDecision::Supported(*route))
        .unwrap_or_else(|| RouteDecision::Unsupported(action_name.to_string()))
}
