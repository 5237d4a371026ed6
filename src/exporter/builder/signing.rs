//! Command lines for the apktool/zipalign/apksigner steps.

use super::tool_detection::Toolchain;
use crate::exporter::process::ToolCommand;
use crate::properties::KeystoreSettings;
use std::path::Path;

/// `apktool d -f -o <decompiled> <template>`
pub fn decompile_command(tools: &Toolchain, template: &Path, decompiled_dir: &Path) -> ToolCommand {
    ToolCommand::new(&tools.apktool)
        .arg("d")
        .arg("-f")
        .arg("-o")
        .arg_path(decompiled_dir)
        .arg_path(template)
}

/// `apktool b <decompiled> -o <unsigned>`
pub fn rebuild_command(tools: &Toolchain, decompiled_dir: &Path, unsigned: &Path) -> ToolCommand {
    ToolCommand::new(&tools.apktool)
        .arg("b")
        .arg_path(decompiled_dir)
        .arg("-o")
        .arg_path(unsigned)
}

/// `zipalign -f -p 4 <unsigned> <aligned>`
pub fn align_command(tools: &Toolchain, unsigned: &Path, aligned: &Path) -> ToolCommand {
    ToolCommand::new(&tools.zipalign)
        .arg("-f")
        .arg("-p")
        .arg("4")
        .arg_path(unsigned)
        .arg_path(aligned)
}

/// `apksigner sign` in place. The store password is also used as the key password.
pub fn sign_command(tools: &Toolchain, keystore: &KeystoreSettings, aligned: &Path) -> ToolCommand {
    let pass = format!("pass:{}", keystore.password);

    ToolCommand::new(&tools.apksigner)
        .arg("sign")
        .arg("--ks")
        .arg_path(&keystore.path)
        .arg("--ks-key-alias")
        .arg(&keystore.alias)
        .arg("--ks-pass")
        .arg(&pass)
        .arg("--key-pass")
        .arg(pass)
        .arg_path(aligned)
}
