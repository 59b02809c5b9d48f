//! Static Pages
//!
//! Browser-facing HTML. The dashboard is a single self-contained page that
//! drives the /api endpoints from script.

pub const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>ZT Admin Login</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body { font-family: Arial, sans-serif; background: #f5f5f5; margin: 0; }
        .login-container { max-width: 400px; margin: 100px auto; background: white; padding: 40px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        h1 { text-align: center; color: #333; margin-bottom: 30px; }
        .form-group { margin-bottom: 20px; }
        label { display: block; margin-bottom: 5px; color: #555; }
        input[type='text'], input[type='password'] { width: 100%; padding: 12px; border: 1px solid #ddd; border-radius: 4px; box-sizing: border-box; }
        .btn { width: 100%; padding: 12px; background: #007bff; color: white; border: none; border-radius: 4px; cursor: pointer; font-size: 16px; }
        .btn:hover { background: #0056b3; }
        .info { color: #666; text-align: center; margin-top: 20px; font-size: 14px; }
    </style>
</head>
<body>
    <div class="login-container">
        <h1>ZT Admin Login</h1>
        <form method="post" action="/login">
            <div class="form-group">
                <label for="username">Username:</label>
                <input type="text" id="username" name="username" required>
            </div>
            <div class="form-group">
                <label for="password">Password:</label>
                <input type="password" id="password" name="password" required>
            </div>
            <button type="submit" class="btn">Login</button>
        </form>
        <div class="info">
            Please change the default password after first login.
        </div>
    </div>
</body>
</html>
"#;

pub const LOGIN_FAILED_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Login Failed</title></head>
<body><h1>Login Failed</h1><p>Invalid username or password.</p>
<a href="/login">Try again</a></body></html>
"#;

pub const DASHBOARD_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>ZT Admin - ZeroTier Network Controller</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body { font-family: Arial, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #333; border-bottom: 2px solid #007bff; padding-bottom: 10px; }
        .status { padding: 10px; margin: 10px 0; border-radius: 4px; }
        .status.online { background: #d4edda; color: #155724; }
        .status.offline { background: #f8d7da; color: #721c24; }
        .network-item { background: #f8f9fa; margin: 10px 0; padding: 15px; border-radius: 4px; border-left: 4px solid #007bff; }
        .btn { padding: 8px 16px; margin: 5px; border: none; border-radius: 4px; cursor: pointer; }
        .btn-primary { background: #007bff; color: white; }
        .btn-success { background: #28a745; color: white; }
        .btn-danger { background: #dc3545; color: white; }
    </style>
</head>
<body>
    <div class="container">
        <h1>ZeroTier Network Controller</h1>
        <div id="status">Loading...</div>
        <div id="content">Loading...</div>
        <p><a href="/logout">Log out</a></p>
    </div>
    <script>
        function loadStatus() {
            fetch('/api/status')
                .then(r => r.json())
                .then(data => {
                    const el = document.getElementById('status');
                    if (data.online) {
                        el.className = 'status online';
                        el.textContent = 'ZeroTier Status: Online (Node ID: ' + data.address + ')';
                    } else {
                        el.className = 'status offline';
                        el.textContent = 'ZeroTier Status: Offline';
                    }
                })
                .catch(() => { document.getElementById('status').textContent = 'Error loading status'; });
        }
        function loadNetworks() {
            fetch('/api/networks')
                .then(r => r.json())
                .then(data => {
                    let html = '<h2>Networks</h2>';
                    if (!data.length) {
                        html += '<p>No networks found.</p>';
                    } else {
                        data.forEach(id => {
                            html += '<div class="network-item"><p>Network ID: ' + id + '</p>'
                                 + '<button class="btn btn-danger" onclick="deleteNetwork(\'' + id + '\')">Delete</button></div>';
                        });
                    }
                    html += '<button class="btn btn-success" onclick="createNetwork()">Create Network</button>';
                    document.getElementById('content').innerHTML = html;
                })
                .catch(() => { document.getElementById('content').textContent = 'Error loading networks'; });
        }
        function createNetwork() {
            const name = prompt('Enter network name:');
            if (name) {
                fetch('/api/networks', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ name: name })
                }).then(loadNetworks);
            }
        }
        function deleteNetwork(id) {
            if (confirm('Delete this network?')) {
                fetch('/api/networks/' + id, { method: 'DELETE' }).then(loadNetworks);
            }
        }
        loadStatus();
        loadNetworks();
        setInterval(() => { loadStatus(); loadNetworks(); }, 30000);
    </script>
</body>
</html>
"#;

pub const NOT_FOUND_PAGE: &str = "<html><body><h1>404 Not Found</h1></body></html>";
