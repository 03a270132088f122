//! Embedded HTML for the console, activation, and admin pages.
//!
//! `__TOKEN__`-style placeholders are substituted by the handlers; the
//! pages carry no build-time templating dependency.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>licshim — license server</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 640px; margin: 3rem auto; padding: 0 1rem; color: #222; }
  h1 { font-size: 1.4rem; }
  code, input { font-family: ui-monospace, monospace; }
  input, select, button { font-size: 1rem; padding: .4rem; margin: .2rem 0; }
  input { width: 100%; box-sizing: border-box; }
  #result { margin-top: 1rem; padding: .8rem; background: #f4f4f4; border-radius: 6px; word-break: break-all; display: none; }
</style>
</head>
<body>
<h1>License server console</h1>
<p>Server address: <code>__BASE_URL__</code></p>
<p>Generate an activation link. Lease clients take the full per-GUID URL
(example GUID: <code>__EXAMPLE_GUID__</code>); ticket clients point at the
server root.</p>
<label>Product
  <select id="product">
    <option value="lease">Lease protocol</option>
    <option value="ticket">Ticket protocol</option>
  </select>
</label>
<label>GUID (optional, random when empty)
  <input id="guid" placeholder="e.g. __EXAMPLE_GUID__">
</label>
<button id="go">Generate</button>
<div id="result"></div>
<script>
document.getElementById('go').addEventListener('click', async () => {
  const resp = await fetch('/generate', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({
      product: document.getElementById('product').value,
      guid: document.getElementById('guid').value,
    }),
  });
  const data = await resp.json();
  const out = document.getElementById('result');
  out.style.display = 'block';
  out.textContent = 'Activation URL: ' + data.activation_url;
});
</script>
</body>
</html>
"#;

pub const ACTIVATION_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Activation</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 640px; margin: 3rem auto; padding: 0 1rem; color: #222; }
  code { font-family: ui-monospace, monospace; background: #f4f4f4; padding: .1rem .3rem; border-radius: 4px; word-break: break-all; }
</style>
</head>
<body>
<h1>Activation</h1>
<p>Point your client's license server setting at:</p>
<p><code>__ACTIVATION_URL__</code></p>
<p>GUID: <code>__GUID__</code></p>
<p>Any email address is accepted.</p>
</body>
</html>
"#;

pub const ADMIN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>licshim — usage history</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 900px; margin: 2rem auto; padding: 0 1rem; color: #222; }
  table { border-collapse: collapse; width: 100%; font-size: .9rem; }
  th, td { border: 1px solid #ddd; padding: .35rem .5rem; text-align: left; }
  th { background: #f4f4f4; }
  input, button { font-size: 1rem; padding: .35rem; }
  #stats { margin: .8rem 0; }
</style>
</head>
<body>
<h1>Usage history</h1>
<p>
  <input id="token" type="password" placeholder="admin token">
  <input id="search" placeholder="search guid / ip / username">
  <button id="load">Load</button>
</p>
<div id="stats"></div>
<table>
  <thead>
    <tr><th>Time</th><th>Product</th><th>Action</th><th>Client</th><th>User</th><th>IP</th></tr>
  </thead>
  <tbody id="rows"></tbody>
</table>
<script>
async function fetchJson(path) {
  const token = document.getElementById('token').value;
  const resp = await fetch(path, {headers: {'Authorization': 'Bearer ' + token}});
  if (!resp.ok) throw new Error('request failed: ' + resp.status);
  return resp.json();
}
document.getElementById('load').addEventListener('click', async () => {
  try {
    const search = encodeURIComponent(document.getElementById('search').value);
    const stats = await fetchJson('/api/admin/stats');
    document.getElementById('stats').textContent =
      `total ${stats.total} · today ${stats.today} · lease ${stats.lease} · ticket ${stats.ticket}`;
    const page = await fetchJson(`/api/admin/records?page=1&page_size=50&search=${search}`);
    const rows = document.getElementById('rows');
    rows.innerHTML = '';
    for (const r of page.records) {
      const tr = document.createElement('tr');
      for (const v of [r.timestamp, r.product, r.action, r.client_id ?? '', r.username ?? '', r.ip]) {
        const td = document.createElement('td');
        td.textContent = v;
        tr.appendChild(td);
      }
      rows.appendChild(tr);
    }
  } catch (e) {
    document.getElementById('stats').textContent = String(e);
  }
});
</script>
</body>
</html>
"#;
