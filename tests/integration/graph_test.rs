//! Import graph properties over real scans

use super::support::*;
use tempfile::tempdir;

#[test]
fn test_fan_totals_match_edge_count() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/index.ts", "import { a } from './a';\nimport { b } from './b';\nimport React from 'react';\n");
    write(dir.path(), "src/a.ts", "import { util } from './lib/util';\nexport const a = 1;\n");
    write(dir.path(), "src/b.tsx", "export * from './lib';\nexport const b = 2;\n");
    write(dir.path(), "src/lib/index.ts", "export { util } from './util';\n");
    write(dir.path(), "src/lib/util.ts", "export const util = () => 0;\n");
    write(dir.path(), "src/missing.ts", "import './does-not-exist';\n");

    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();

    let fan_in: usize = result.files.iter().map(|f| f.fan_in).sum();
    let fan_out: usize = result.files.iter().map(|f| f.fan_out).sum();
    assert_eq!(result.edges.len(), 5);
    assert_eq!(fan_in, result.edges.len());
    assert_eq!(fan_out, result.edges.len());

    let root = canonical(dir.path());
    let util = result.file(&root.join("src/lib/util.ts")).unwrap();
    assert_eq!((util.fan_in, util.fan_out), (2, 0));
    let missing = result.file(&root.join("src/missing.ts")).unwrap();
    assert_eq!((missing.fan_in, missing.fan_out), (0, 0));
}

#[test]
fn test_import_cycle_terminates_and_is_reported() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.js", "const b = require('./b');\n");
    write(dir.path(), "b.js", "import c from './c.js';\n");
    write(dir.path(), "c.js", "export default await import('./a');\n");
    write(dir.path(), "d.js", "import a from './a';\n");

    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();
    let root = canonical(dir.path());

    assert_eq!(result.edges.len(), 4);
    assert_eq!(result.cycles.len(), 1);
    let mut members = result.cycles[0].clone();
    members.sort();
    assert_eq!(members, vec![root.join("a.js"), root.join("b.js"), root.join("c.js")]);

    for name in ["a.js", "b.js", "c.js"] {
        let file = result.file(&root.join(name)).unwrap();
        assert_eq!(file.fan_out, 1, "{name}");
    }
    assert_eq!(result.file(&root.join("a.js")).unwrap().fan_in, 2);
}

#[test]
fn test_duplicate_and_self_imports_collapse() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.ts", "import x from './b';\nimport { y } from './b';\nconst z = require('./b.ts');\nimport './a';\n");
    write(dir.path(), "b.ts", "export const y = 1;\n");

    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();
    assert_eq!(result.edges.len(), 1);
    assert!(result.cycles.is_empty());
}

#[test]
fn test_python_relative_imports() {
    let dir = tempdir().unwrap();
    write(dir.path(), "app/__init__.py", "");
    write(dir.path(), "app/models.py", "class User:\n    pass\n");
    write(dir.path(), "app/services/__init__.py", "");
    write(dir.path(), "app/services/users.py", "from ..models import User\nfrom . import helpers\n");
    write(dir.path(), "app/services/helpers.py", "def help():\n    return 1\n");

    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();
    let root = canonical(dir.path());
    let users = result.file(&root.join("app/services/users.py")).unwrap();
    assert_eq!(users.fan_out, 2);
    assert_eq!(result.file(&root.join("app/models.py")).unwrap().fan_in, 1);
    assert_eq!(result.file(&root.join("app/services/__init__.py")).unwrap().fan_in, 1);
}
