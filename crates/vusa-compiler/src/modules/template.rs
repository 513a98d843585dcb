use super::{Module, FRAGMENT_TAG};
use crate::context::ModuleContext;
use crate::error::CompileResult;
use vusa_template::ElementNode;

/// Turns `<template>` wrappers into fragments.
#[derive(Debug, Default, Clone, Copy)]
pub struct Template;

impl Module for Template {
    fn name(&self) -> &'static str {
        "template"
    }

    fn before_children(&self, el: &mut ElementNode, _ctx: &mut ModuleContext) -> CompileResult<()> {
        if el.tag == "template" {
            el.tag = FRAGMENT_TAG.into();
        }
        Ok(())
    }
}
