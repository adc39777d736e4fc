mod extension;
mod page;
mod params;
mod schema;

pub use self::extension::{
    Command, CommandParam, Extension, Manifest, OnSuccess, Origin, ParamType, Requirement,
    RootItem,
};
pub use self::page::{
    Action, ActionKind, DetailPage, ListItem, ListPage, Page, Preview, PreviewSpec,
};
pub use self::params::{CommandInput, CommandParams, FormInput, FormInputKind};
pub use self::schema::{parse_page, validate_page};
