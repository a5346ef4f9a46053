// glbridge/build.rs
//
//! The `glbridge` build script.

use cfg_aliases::cfg_aliases;
use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};
use std::env;
use std::fs::File;
use std::path::PathBuf;

fn main() {
    cfg_aliases! {
        windows: { target_os = "windows" },
        mock_driver: { feature = "test-driver" },
    }

    let dest = PathBuf::from(&env::var("OUT_DIR").unwrap());

    // The function table loaded during the second bootstrap phase.
    let mut file = File::create(dest.join("gl_bindings.rs")).unwrap();
    let registry = Registry::new(Api::Gl, (4, 5), Profile::Core, Fallbacks::All, []);
    registry.write_bindings(StructGenerator, &mut file).unwrap();
}
