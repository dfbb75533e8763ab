//! Wizard core: step registry, controller, step contract and the live
//! sessions the HTTP host drives.

pub mod controller;
pub mod definition;
pub mod registry;
pub mod result;
pub mod routes;
pub mod session;
pub mod step;

pub use controller::{StepStatus, SubmitOutcome, WizardController};
pub use definition::{FormType, StepDescriptor, StepId, StepKind, WizardDefinition};
pub use registry::{Completion, WizardRegistry};
pub use result::{AccumulatedResult, Submission};
pub use routes::{WizardRouteState, wizard_routes};
pub use session::{WizardSession, WizardView};
pub use step::{StepCommand, StepForm, StepOutcome, StepPayload, submit};
