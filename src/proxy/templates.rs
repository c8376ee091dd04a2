//! Dispatcher script templates
//!
//! Placeholders:
//! - `__MODULE__`: module that declared the entry point (comment only)
//! - `__ENTRY__`: entry point name, already validated as shell-safe
//! - `__ENV__`: environment root relative to the dispatcher's directory

use std::path::Path;

use crate::path_utils::{to_backslashes, to_forward_slashes};

const POSIX: &str = r#"#!/bin/sh
# Generated by stackup for '__MODULE__'. Do not edit; rerun `stackup proxies`.
dir=$(CDPATH= cd -- "$(dirname -- "$0")" && pwd) || exit 1
for target in "$dir/__ENV__/bin/__ENTRY__" "$dir/__ENV__/Scripts/__ENTRY__.exe"; do
    if [ -f "$target" ] && [ -x "$target" ]; then
        exec "$target" "$@"
    fi
done
self=$(CDPATH= cd -- "$dir" && pwd -P) || exit 1
if [ "${STACKUP_PROXY_GUARD:-}" = "$self/__ENTRY__" ]; then
    echo "__ENTRY__: command not found" >&2
    exit 127
fi
# Fall back to PATH without this directory, whatever spelling PATH uses for it.
search=
set -f
old_ifs=$IFS
IFS=:
for p in $PATH; do
    real=$(CDPATH= cd -- "${p:-.}" 2>/dev/null && pwd -P) || real=
    [ "$real" = "$self" ] || search="${search:+$search:}$p"
done
IFS=$old_ifs
set +f
PATH=$search
STACKUP_PROXY_GUARD="$self/__ENTRY__"
export PATH STACKUP_PROXY_GUARD
exec __ENTRY__ "$@"
"#;

const CMD: &str = r#"@echo off
rem Generated by stackup for '__MODULE__'. Do not edit; rerun `stackup proxies`.
setlocal
set "STACKUP_TARGET=%~dp0__ENV__\Scripts\__ENTRY__.exe"
if not exist "%STACKUP_TARGET%" goto fallback
"%STACKUP_TARGET%" %*
exit /b %ERRORLEVEL%
:fallback
set "STACKUP_SELF=%~dp0"
if /i "%STACKUP_PROXY_GUARD%"=="%STACKUP_SELF%__ENTRY__" goto notfound
set "STACKUP_SEARCH="
for %%P in ("%PATH:;=" "%") do call :keep "%%~P"
set "PATH=%STACKUP_SEARCH%"
set "STACKUP_PROXY_GUARD=%STACKUP_SELF%__ENTRY__"
__ENTRY__ %*
exit /b %ERRORLEVEL%
:notfound
echo __ENTRY__: command not found 1>&2
exit /b 127
:keep
if "%~1"=="" goto :eof
set "STACKUP_ENTRY=%~f1"
if not "%STACKUP_ENTRY:~-1%"=="\" set "STACKUP_ENTRY=%STACKUP_ENTRY%\"
if /i "%STACKUP_ENTRY%"=="%STACKUP_SELF%" goto :eof
if defined STACKUP_SEARCH set "STACKUP_SEARCH=%STACKUP_SEARCH%;"
set "STACKUP_SEARCH=%STACKUP_SEARCH%%~1"
goto :eof
"#;

const POWERSHELL: &str = r#"# Generated by stackup for '__MODULE__'. Do not edit; rerun `stackup proxies`.
foreach ($candidate in @('__ENV__/bin/__ENTRY__', '__ENV__/Scripts/__ENTRY__.exe')) {
    $target = Join-Path $PSScriptRoot $candidate
    if (Test-Path -LiteralPath $target -PathType Leaf) {
        & $target @args
        exit $LASTEXITCODE
    }
}
$self = $PSScriptRoot.TrimEnd('\', '/')
$command = Get-Command -Name '__ENTRY__' -CommandType Application -ErrorAction SilentlyContinue |
    Where-Object { (Split-Path -Parent $_.Source).TrimEnd('\', '/') -ne $self } |
    Select-Object -First 1
if (-not $command) {
    Write-Error "__ENTRY__: command not found"
    exit 127
}
& $command.Source @args
exit $LASTEXITCODE
"#;

fn printable(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

fn fill(template: &str, module: &str, entry: &str, env: &str) -> String {
    template
        .replace("__MODULE__", &printable(module))
        .replace("__ENTRY__", entry)
        .replace("__ENV__", env)
}

/// POSIX `sh` dispatcher
pub fn posix(module: &str, entry: &str, env_rel: &Path) -> String {
    let env = to_forward_slashes(env_rel)
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`");
    fill(POSIX, module, entry, &env)
}

/// Windows `cmd` dispatcher, with CRLF line endings
pub fn cmd(module: &str, entry: &str, env_rel: &Path) -> String {
    let env = to_backslashes(env_rel).replace('%', "%%");
    fill(CMD, module, entry, &env).replace('\n', "\r\n")
}

/// PowerShell dispatcher
pub fn powershell(module: &str, entry: &str, env_rel: &Path) -> String {
    let env = to_forward_slashes(env_rel).replace('\'', "''");
    fill(POWERSHELL, &module.replace('\'', "''"), entry, &env)
}
