//! Scripting and function command factories: `EVAL`/`EVALSHA`/`SCRIPT LOAD`
//! for ad-hoc Lua scripts, `FCALL`/`FCALL_RO`/`FUNCTION LOAD` for registered
//! function libraries.

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    protocol::{Command, RequestType},
};

pub fn eval(script: Bytes, keys: impl IntoIterator<Item = Bytes>, args: impl IntoIterator<Item = Bytes>) -> Command {
    encode_script_invocation(RequestType::Eval, script, keys, args)
}

pub fn evalsha(sha1: Bytes, keys: impl IntoIterator<Item = Bytes>, args: impl IntoIterator<Item = Bytes>) -> Command {
    encode_script_invocation(RequestType::EvalSha, sha1, keys, args)
}

fn encode_script_invocation(
    request_type: RequestType,
    script_or_sha: Bytes,
    keys: impl IntoIterator<Item = Bytes>,
    args: impl IntoIterator<Item = Bytes>,
) -> Command {
    let keys: Vec<Bytes> = keys.into_iter().collect();
    let builder = ArgBuilder::new()
        .push_bytes(script_or_sha)
        .push_int(keys.len() as i64)
        .extend(keys)
        .extend(args);
    Command::new(request_type, builder.build())
}

pub fn script_load(script: Bytes) -> Command {
    Command::new(RequestType::ScriptLoad, ArgBuilder::new().push_bytes(script).build())
}

/// `FCALL func keys_count keys... args...` / `FCALL_RO func keys_count keys... args...`.
pub fn fcall(
    function: Bytes,
    keys: impl IntoIterator<Item = Bytes>,
    args: impl IntoIterator<Item = Bytes>,
    read_only: bool,
) -> Command {
    let request_type = if read_only {
        RequestType::FCallReadOnly
    } else {
        RequestType::FCall
    };
    encode_script_invocation(request_type, function, keys, args)
}

/// `FUNCTION LOAD [REPLACE] code`.
pub fn function_load(code: Bytes, replace: bool) -> Command {
    let builder = ArgBuilder::new().push_if(replace, "REPLACE").push_bytes(code);
    Command::new(RequestType::FunctionLoad, builder.build())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn eval_encodes_numkeys_before_keys_and_args() {
        let cmd = eval(
            Bytes::from_static(b"return 1"),
            [Bytes::from_static(b"k1")],
            [Bytes::from_static(b"a1")],
        );
        assert_eq!(
            cmd.args,
            vec![
                Bytes::from_static(b"return 1"),
                Bytes::from_static(b"1"),
                Bytes::from_static(b"k1"),
                Bytes::from_static(b"a1"),
            ]
        );
    }
}
