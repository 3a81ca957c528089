//! In-process debug monitor for tests
//!
//! Speaks enough of the protocol to drive a `Session`: greeting, handshake
//! queries, getmem/setmem against a sparse byte map, getfile/sendfile against
//! an in-memory file table, and scripted raw replies.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use xedbg::Config;

/// Shared state the test can inspect
#[derive(Default)]
pub struct MockState {
    pub memory: Mutex<HashMap<u32, u8>>,
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    pub commands: Mutex<Vec<String>>,
    pub connections: AtomicUsize,
}

impl MockState {
    pub fn poke(&self, addr: u32, bytes: &[u8]) {
        let mut memory = self.memory.lock();
        for (i, b) in bytes.iter().enumerate() {
            memory.insert(addr + i as u32, *b);
        }
    }

    pub fn peek(&self, addr: u32, len: usize) -> Vec<Option<u8>> {
        let memory = self.memory.lock();
        (0..len).map(|i| memory.get(&(addr + i as u32)).copied()).collect()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct MockOptions {
    greeting: String,
    freeboot: bool,
    version: String,
    stall: HashMap<String, Duration>,
    replies: HashMap<String, String>,
    hangups: Vec<String>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            greeting: "201- connected".to_string(),
            freeboot: false,
            version: "2.0.21250.0".to_string(),
            stall: HashMap::new(),
            replies: HashMap::new(),
            hangups: Vec::new(),
        }
    }
}

/// Builder for a mock console
#[derive(Default)]
pub struct MockConsoleBuilder {
    options: MockOptions,
}

impl MockConsoleBuilder {
    pub fn greeting(mut self, line: &str) -> Self {
        self.options.greeting = line.to_string();
        self
    }

    /// Identify as the freeboot dialect
    pub fn freeboot(mut self) -> Self {
        self.options.freeboot = true;
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.options.version = version.to_string();
        self
    }

    /// Delay the reply to `verb`
    pub fn stall(mut self, verb: &str, delay: Duration) -> Self {
        self.options.stall.insert(verb.to_string(), delay);
        self
    }

    /// Answer `verb` with raw text (CRLFs included by the caller)
    pub fn reply(mut self, verb: &str, raw: &str) -> Self {
        self.options.replies.insert(verb.to_string(), raw.to_string());
        self
    }

    /// Close the connection right after answering `verb`
    pub fn hangup_after(mut self, verb: &str) -> Self {
        self.options.hangups.push(verb.to_string());
        self
    }

    pub fn start(self) -> MockConsole {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(MockState::default());
        let options = Arc::new(self.options);

        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                accept_state.connections.fetch_add(1, Ordering::SeqCst);
                let state = Arc::clone(&accept_state);
                let options = Arc::clone(&options);
                thread::spawn(move || serve(stream, &state, &options));
            }
        });

        MockConsole { addr, state }
    }
}

/// A running mock console
pub struct MockConsole {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockConsole {
    pub fn builder() -> MockConsoleBuilder {
        MockConsoleBuilder::default()
    }

    pub fn start() -> Self {
        Self::builder().start()
    }

    /// Host string with port, accepted by `Session::connect`
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    pub fn config(&self) -> Config {
        Config::builder()
            .port(self.addr.port())
            .read_timeout_ms(5000)
            .build()
    }
}

fn serve(stream: TcpStream, state: &MockState, options: &MockOptions) {
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);

    if send(&mut writer, format!("{}\r\n", options.greeting).as_bytes()).is_err() {
        return;
    }

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let command = line.trim_end_matches(['\r', '\n']).to_string();
        state.commands.lock().push(command.clone());

        let verb = command.split_whitespace().next().unwrap_or("").to_ascii_lowercase();

        if let Some(delay) = options.stall.get(&verb) {
            thread::sleep(*delay);
        }

        let reply = if let Some(raw) = options.replies.get(&verb) {
            raw.clone().into_bytes()
        } else {
            match verb.as_str() {
                "bye" => {
                    let _ = send(&mut writer, b"200- bye\r\n");
                    return;
                }
                "whomadethis" if options.freeboot => b"200- Natelx\r\n".to_vec(),
                "dmversion" => format!("200- {}\r\n", options.version).into_bytes(),
                "dbgname" => b"200- jtag\r\n".to_vec(),
                "getmem" => getmem(&command, state),
                "setmem" => setmem(&command, state),
                "getfile" => getfile(&command, state),
                "sendfile" => {
                    let Some(name) = arg(&command, "name") else {
                        let _ = send(&mut writer, b"407- missing name\r\n");
                        continue;
                    };
                    let length: usize = arg(&command, "length")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0);
                    if send(&mut writer, b"204- send binary data\r\n").is_err() {
                        return;
                    }
                    let mut data = vec![0u8; length];
                    if reader.read_exact(&mut data).is_err() {
                        return;
                    }
                    state.files.lock().insert(name, data);
                    b"200- OK\r\n".to_vec()
                }
                _ => b"407- unknown command\r\n".to_vec(),
            }
        };

        if send(&mut writer, &reply).is_err() || options.hangups.contains(&verb) {
            return;
        }
    }
}

fn send(writer: &mut TcpStream, bytes: &[u8]) -> std::io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}

fn getmem(command: &str, state: &MockState) -> Vec<u8> {
    let addr = arg(command, "addr").and_then(|v| parse_number(&v)).unwrap_or(0);
    let length = arg(command, "length").and_then(|v| parse_number(&v)).unwrap_or(0);

    let mut reply = b"202- memory data follows\r\n".to_vec();
    let bytes = state.peek(addr, length as usize);
    for row in bytes.chunks(16) {
        let line: String = row
            .iter()
            .map(|b| match b {
                Some(b) => format!("{:02X}", b),
                None => "??".to_string(),
            })
            .collect();
        reply.extend_from_slice(line.as_bytes());
        reply.extend_from_slice(b"\r\n");
    }
    reply.extend_from_slice(b".\r\n");
    reply
}

fn setmem(command: &str, state: &MockState) -> Vec<u8> {
    let addr = arg(command, "addr").and_then(|v| parse_number(&v)).unwrap_or(0);
    let Some(data) = arg(command, "data").and_then(|v| hex::decode(v).ok()) else {
        return b"423- bad data\r\n".to_vec();
    };
    state.poke(addr, &data);
    format!("200- set {} bytes\r\n", data.len()).into_bytes()
}

fn getfile(command: &str, state: &MockState) -> Vec<u8> {
    let name = arg(command, "name").unwrap_or_default();
    match state.files.lock().get(&name) {
        Some(data) => {
            let mut reply = b"203- binary response follows\r\n".to_vec();
            reply.extend_from_slice(&(data.len() as u32).to_le_bytes());
            reply.extend_from_slice(data);
            reply
        }
        None => b"402- file not found\r\n".to_vec(),
    }
}

/// Extract `key=value` or `key="value"` from a command line
pub fn arg(command: &str, key: &str) -> Option<String> {
    let pattern = format!(" {}=", key);
    let start = command.find(&pattern)? + pattern.len();
    let rest = &command[start..];

    if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted.find('"')?;
        return Some(quoted[..end].to_string());
    }

    Some(rest.split_whitespace().next().unwrap_or("").to_string())
}

fn parse_number(value: &str) -> Option<u32> {
    match value.strip_prefix("0x") {
        Some(digits) => u32::from_str_radix(digits, 16).ok(),
        None => value.parse().ok(),
    }
}
