use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};

pub fn specgrade() -> Command {
    cargo_bin_cmd!("specgrade")
}

/// Write a contract fixture into the given directory and return its path
#[allow(dead_code)]
pub fn write_contract(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write contract fixture");
    path
}

/// Contract with paths outside the /api/v2 namespace
#[allow(dead_code)]
pub const LEGACY_CONTRACT: &str = r#"
openapi: 3.0.3
info:
  title: Legacy Directory
  version: 1.0.0
paths:
  /users:
    get:
      responses:
        "200":
          description: OK
  /products:
    get:
      responses:
        "200":
          description: OK
"#;

/// Contract fully under the /api/v2 namespace with cursor pagination
#[allow(dead_code)]
pub const NAMESPACED_CONTRACT: &str = r#"
openapi: 3.0.3
info:
  title: Orders API
  version: 2.1.0
paths:
  /api/v2/orders:
    get:
      parameters:
        - name: cursor
          in: query
          schema:
            type: string
        - name: limit
          in: query
          schema:
            type: integer
            maximum: 100
      responses:
        "200":
          description: OK
  /api/v2/orders/{id}:
    get:
      responses:
        "200":
          description: OK
"#;

/// Contract with offset/page pagination on a list endpoint
#[allow(dead_code)]
pub const OFFSET_CONTRACT: &str = r#"
openapi: 3.0.3
info:
  title: Paged API
  version: 1.0.0
paths:
  /api/v2/items:
    get:
      parameters:
        - name: offset
          in: query
          schema:
            type: integer
        - name: page
          in: query
          schema:
            type: integer
      responses:
        "200":
          description: OK
"#;

/// Contract with no paths object at all
#[allow(dead_code)]
pub const PATHLESS_CONTRACT: &str = r#"
openapi: 3.0.3
info:
  title: Empty Surface
  version: 0.1.0
"#;
